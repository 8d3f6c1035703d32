//! Generate an assessment report for validation testing

use nephra_core::pipeline::{assess, dedupe_daily, parse_observations_ndjson};
use nephra_core::types::UserProfile;
use nephra_core::ReportEncoder;

fn main() {
    let ndjson = r#"
        {"date":"2025-06-01","userId":"demo-user","systolicBP":132,"diastolicBP":84,"hydrationLiters":1.8,"fatigueLevel":4}
        {"date":"2025-06-02","userId":"demo-user","systolicBP":128,"diastolicBP":82,"hydrationLiters":2.1,"fatigueLevel":3}
        {"date":"2025-06-03","userId":"demo-user","systolicBP":141,"diastolicBP":88,"hydrationLiters":1.2,"fatigueLevel":6,"stressLevel":7}
    "#;

    let history = parse_observations_ndjson(ndjson).expect("demo input parses");
    let daily = dedupe_daily(&history);

    let mut profile = UserProfile::new("demo-user");
    profile.height_cm = Some(170.0);
    profile.weight_kg = Some(74.0);

    match assess(&daily, &profile) {
        Ok(assessment) => {
            let encoder = ReportEncoder::with_instance_id("demo");
            match encoder.encode_to_json(assessment, &daily, "demo-user") {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error: {e:?}"),
            }
        }
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
