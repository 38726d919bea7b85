use std::fs;
use std::path::Path;

const STARTER_MANIFEST: &str = r#"# Kindcheck architecture manifest.
#
# Declare Kinds (architectural types with members and constraints), then
# instantiate them over your source tree. Run `kindcheck check` to derive
# and verify the resulting contracts.

[kinds.Context]
members = [
    { name = "domain", typeName = "DomainLayer" },
    { name = "infra", typeName = "InfraLayer" },
]
constraints = { noDependency = [["domain", "infra"]] }

[kinds.DomainLayer]
[kinds.InfraLayer]

[[instances]]
name = "app"
kind = "Context"
path = "./src"
"#;

pub fn run(manifest: String, force: bool) {
    let path = Path::new(&manifest);
    if path.exists() && !force {
        eprintln!("kindcheck: {manifest} already exists (use --force to overwrite)");
        std::process::exit(1);
    }

    if let Err(err) = fs::write(path, STARTER_MANIFEST) {
        eprintln!("kindcheck: cannot write {manifest}: {err}");
        std::process::exit(1);
    }
    println!("Wrote {manifest}");
}
