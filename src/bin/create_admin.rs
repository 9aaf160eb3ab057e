use sahayya::{Config, bootstrap_admin};
use tracing_subscriber::EnvFilter;

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} <admin-email> [full-name]");
    eprintln!("The password is read from the ADMIN_PASSWORD environment variable.");
}

fn init_tracing(log_level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "create_admin".to_string());
    let email = match args.next() {
        Some(email) => email,
        None => {
            print_usage(&bin_name);
            std::process::exit(2);
        }
    };
    let full_name = args.next().unwrap_or_else(|| "Administrator".to_string());
    if args.next().is_some() {
        print_usage(&bin_name);
        std::process::exit(2);
    }

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            eprintln!("ADMIN_PASSWORD must be set to the desired admin password");
            std::process::exit(2);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    match bootstrap_admin(&config, &full_name, &email, &password).await {
        Ok(user_id) => {
            println!("Admin account ready: email={email}, user_id={user_id}");
        }
        Err(err) => {
            eprintln!("Failed to bootstrap admin account: {err}");
            std::process::exit(1);
        }
    }
}
