//! Prints the JSON Schema of profile and group documents as YAML.

use anyhow::Result;
use boot_model::{Group, ProfileDocument};

fn main() -> Result<()> {
    let profile = schemars::schema_for!(ProfileDocument);
    let group = schemars::schema_for!(Group);

    print!("{}", serde_yaml::to_string(&profile)?);
    println!("---");
    print!("{}", serde_yaml::to_string(&group)?);

    Ok(())
}
