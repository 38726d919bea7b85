use kindcheck_bind::{OsFiles, ProviderRegistry};
use kindcheck_pipeline::{ManifestScanner, Pipeline, StructuralChecker};
use serde_json::json;

pub fn run(manifest: String, json_output: bool) {
    let scanner = ManifestScanner::new(&manifest);
    let probe = OsFiles;
    let registry = ProviderRegistry::builtin();
    let checker = StructuralChecker;
    let mut pipeline = Pipeline::new(&scanner, &probe, &registry, &checker);

    let record = match pipeline.execute() {
        Ok(record) => record,
        Err(err) => {
            eprintln!("kindcheck: {err}");
            std::process::exit(1);
        }
    };

    if json_output {
        let mut payload = serde_json::to_value(&record).expect("json serialization");
        payload["manifest"] = json!(manifest);
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("kindcheck check {manifest}");
        println!("  Contracts checked: {}", record.contracts_checked);
        println!("  Files analyzed: {}", record.files_analyzed);
        println!("  Completed: {}", record.completed_at.to_rfc3339());
        if !record.classification_errors.is_empty() {
            println!("  Classification errors:");
            for error in &record.classification_errors {
                println!("    - {error}");
            }
        }
        if record.diagnostics.is_empty() {
            println!("  Diagnostics: none");
        } else {
            println!("  Diagnostics:");
            for diagnostic in &record.diagnostics {
                println!("    {diagnostic}");
            }
        }
    }

    if !record.diagnostics.is_empty() {
        std::process::exit(1);
    }
}
