use envdoc::{EnvSchema, Exporter};
use std::time::Duration;

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct DemoConfig {
    #[field(env = "APP_NAME", default = "envdoc-demo", desc = "Service name reported in logs")]
    pub app_name: String,

    #[field(env = "PORT", default = "8080", desc = "HTTP listen port")]
    pub port: u16,

    #[field(env = "LOG_LEVEL", default = "info", validate = "oneof=trace debug info warn error")]
    pub log_level: String,

    #[field(nested)]
    pub database: DatabaseConfig,
}

#[allow(dead_code)]
#[derive(EnvSchema)]
pub struct DatabaseConfig {
    #[field(env = "DATABASE_URL", default = "postgres://localhost/app", desc = "Connection string")]
    pub url: String,

    #[field(env = "DATABASE_POOL_SIZE", default = "8")]
    pub pool_size: u32,

    #[field(env = "DATABASE_TIMEOUT", default = "5s", desc = "Connect timeout")]
    pub timeout: Duration,
}

const DEMO_FILE: &str = ".env.demo";

fn main() {
    match std::env::args().nth(1) {
        Some(arg) => match arg.as_str() {
            "export" => export_file(),
            "print" => print_output(),
            "check" => check_file(),
            _ => println!("unknown arg: {}. Available: export, print, check", arg),
        },
        None => {
            println!("Usage: envdoc-cli [command]");
            println!("Commands:");
            println!("  export - Write the demo config's env file to {}", DEMO_FILE);
            println!("  print  - Print the rendered env file to stdout");
            println!("  check  - Re-read {} and list the variables found", DEMO_FILE);
        }
    };
}

fn demo_exporter() -> Exporter {
    Exporter::new()
        .with_environment_tag_name("env")
        .with_header_text("# envdoc demo configuration")
        .with_extra_entry("COMPOSE_PROJECT_NAME", "envdoc-demo")
        .with_extra_tag("validate")
        .with_file_name(DEMO_FILE)
}

fn export_file() {
    match demo_exporter().to_file::<DemoConfig>() {
        Ok(()) => println!("✓ Env file written to {}", DEMO_FILE),
        Err(e) => eprintln!("✗ Failed to write env file: {}", e),
    }
}

fn print_output() {
    let data = demo_exporter().export::<DemoConfig>();
    print!("{}", String::from_utf8_lossy(&data));
}

fn check_file() {
    match dotenvy::from_filename_iter(DEMO_FILE) {
        Ok(entries) => {
            println!("Variables in {}:", DEMO_FILE);
            for entry in entries {
                match entry {
                    Ok((key, value)) => println!("  {}={}", key, value),
                    Err(e) => eprintln!("  parse error: {}", e),
                }
            }
        }
        Err(e) => eprintln!("✗ Failed to read {}: {}", DEMO_FILE, e),
    }
}
