//! Example: named environments with process-env overrides.
//!
//! Run with defaults:
//!   cargo run --package envcell --example environments
//!
//! Override a declared key and select the environment from the shell:
//!   `ENV=prod APP_API_KEY=xyz APP_PORT=9090 cargo run --package envcell --example environments`
#![allow(unused, dead_code)]

use envcell::{Descriptor, EnvLoader, EnvironmentSpec, MaskPolicy};

fn main() {
    let dev = EnvironmentSpec::new()
        .set("APP_HOST", "localhost")
        .set_with("APP_PORT", Descriptor::positive_integer(), "8080")
        .set_with("APP_API_KEY", Descriptor::secret(), "dev-key");

    let prod = EnvironmentSpec::new()
        .set("APP_HOST", "app.internal")
        .set_with("APP_PORT", Descriptor::positive_integer(), "80")
        .declare("APP_API_KEY", Descriptor::secret());

    let result = EnvLoader::new()
        .environment("dev", dev)
        .environment("prod", prod)
        .default_environment("dev")
        .policy(MaskPolicy::default())
        .override_from_process_env(true)
        .load();

    match result {
        Ok(loaded) => {
            println!("environment: {}", loaded.name());
            println!("config:      {}", loaded.config());
        }

        Err(e) => {
            // Use miette's Report for fancy error rendering
            eprintln!("{:?}", envcell::miette::Report::from(e));
            std::process::exit(1);
        }
    }
}
