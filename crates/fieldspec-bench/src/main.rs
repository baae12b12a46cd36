//! Benchmark for fieldspec validation and JSON round-tripping using city data.
//!
//! Loads a JSON array of city records, converts each into a `City` instance
//! (with a nested `Region` and an optional translation map) and times
//! validation, serialization and deserialization over the whole set.

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use fieldspec::{FieldSpec, Instance, ModelType, Value, deserialize, serialize};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct City {
    id: u32,
    name: String,
    state_code: String,
    state_name: String,
    country_code: String,
    latitude: String,
    longitude: String,
    #[serde(rename = "type")]
    city_type: Option<String>,
    population: Option<i64>,
    timezone: Option<String>,
    translations: Option<std::collections::HashMap<String, String>>,
    #[serde(rename = "wikiDataId")]
    wikidata_id: Option<String>,
}

// =============================================================================
// MODEL DECLARATIONS
// =============================================================================

struct Models {
    region: Arc<ModelType>,
    city: Arc<ModelType>,
}

fn declare_models() -> Models {
    let region = ModelType::builder("Region")
        .field("state_code", FieldSpec::string().required())
        .field("state_name", FieldSpec::string().required())
        .field("country_code", FieldSpec::string().required())
        .build()
        .expect("Region declaration is valid");

    let city = ModelType::builder("City")
        .field("id", FieldSpec::integer_range(0, i64::from(u32::MAX)).required())
        .field("name", FieldSpec::string().required())
        .field("region", FieldSpec::object(&region).required())
        .field(
            "location",
            FieldSpec::list([
                FieldSpec::float_range(-90.0, 90.0),
                FieldSpec::float_range(-180.0, 180.0),
            ])
            .nullable(),
        )
        .field("city_type", FieldSpec::string().nullable())
        .field("population", FieldSpec::integer_range(0, i64::MAX).nullable())
        .field("timezone", FieldSpec::string().nullable())
        .field(
            "translations",
            FieldSpec::dict(FieldSpec::string(), FieldSpec::string()).nullable(),
        )
        .field("wikidata_id", FieldSpec::string().nullable())
        .build()
        .expect("City declaration is valid");

    Models { region, city }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn build_city(models: &Models, city: &City) -> Instance {
    let region = Instance::new(&models.region)
        .with("state_code", city.state_code.as_str())
        .and_then(|r| r.with("state_name", city.state_name.as_str()))
        .and_then(|r| r.with("country_code", city.country_code.as_str()))
        .expect("region attributes are declared");

    let location = match (city.latitude.parse::<f64>(), city.longitude.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Value::from(vec![Value::from(lat), Value::from(lon)]),
        _ => Value::Null,
    };

    let translations = city.translations.as_ref().map(|t| {
        let mut entries: Vec<(&String, &String)> = t.iter().collect();
        entries.sort();
        Value::Map(
            entries
                .into_iter()
                .map(|(lang, text)| (lang.clone(), Value::from(text.as_str())))
                .collect(),
        )
    });

    let mut instance = Instance::new(&models.city);
    let attributes: [(&str, Value); 9] = [
        ("id", Value::from(city.id)),
        ("name", Value::from(city.name.as_str())),
        ("region", Value::from(region)),
        ("location", location),
        ("city_type", Value::from(city.city_type.clone())),
        ("population", Value::from(city.population)),
        ("timezone", Value::from(city.timezone.clone())),
        ("translations", Value::from(translations)),
        ("wikidata_id", Value::from(city.wikidata_id.clone())),
    ];
    for (name, value) in attributes {
        instance.set(name, value).expect("city attributes are declared");
    }
    instance
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "../../out/cities.json".to_string());

    println!("Loading cities from: {}", data_path);

    let json_data = fs::read_to_string(&data_path).expect("Failed to read cities.json");

    let parse_start = Instant::now();
    let cities: Vec<City> = serde_json::from_str(&json_data).expect("Failed to parse JSON");
    let parse_time = parse_start.elapsed();

    println!("Loaded {} cities in {:?}", cities.len(), parse_time);

    let models = declare_models();

    let convert_start = Instant::now();
    let instances: Vec<Instance> = cities.iter().map(|c| build_city(&models, c)).collect();
    let convert_time = convert_start.elapsed();
    println!("Converted to {} instances in {:?}", instances.len(), convert_time);

    // Validation
    let validate_start = Instant::now();
    let mut valid: Vec<&Instance> = Vec::with_capacity(instances.len());
    let mut invalid: Vec<(usize, Vec<String>)> = Vec::new();
    for (i, instance) in instances.iter().enumerate() {
        let validation = instance.validate();
        if validation.is_valid() {
            valid.push(instance);
        } else {
            invalid.push((i, validation.into_errors()));
        }
    }
    let validate_time = validate_start.elapsed();
    println!(
        "\nValidated {} instances in {:?} ({} invalid)",
        instances.len(),
        validate_time,
        invalid.len()
    );
    for (i, errors) in invalid.iter().take(5) {
        println!("  city {}: {}", cities[*i].id, errors.join("; "));
    }

    // Serialization
    let serialize_start = Instant::now();
    let encoded: Vec<String> = valid
        .iter()
        .map(|instance| serialize(instance).expect("Failed to serialize"))
        .collect();
    let serialize_time = serialize_start.elapsed();
    let total_bytes: usize = encoded.iter().map(String::len).sum();

    println!(
        "\nSerialized {} instances ({} bytes) in {:?}",
        encoded.len(),
        total_bytes,
        serialize_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / serialize_time.as_secs_f64()
    );

    // Deserialization
    let deserialize_start = Instant::now();
    let decoded: Vec<Instance> = encoded
        .iter()
        .map(|text| deserialize(&models.city, text).expect("Failed to deserialize"))
        .collect();
    let deserialize_time = deserialize_start.elapsed();

    println!(
        "\nDeserialized {} instances in {:?}",
        decoded.len(),
        deserialize_time
    );
    println!(
        "  Throughput: {:.2} MB/s",
        (total_bytes as f64 / 1_000_000.0) / deserialize_time.as_secs_f64()
    );

    let mismatches = decoded
        .iter()
        .zip(&valid)
        .filter(|(after, before)| *after != **before)
        .count();

    println!("\n=== Summary ===");
    println!("Cities: {}", cities.len());
    println!("Valid: {}", valid.len());
    println!("Round-trip mismatches: {}", mismatches);
    println!(
        "Average record size: {:.1} bytes",
        total_bytes as f64 / encoded.len().max(1) as f64
    );
}
