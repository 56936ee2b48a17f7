use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use rollbook_cli::seeder::{self, SeedConfig};
use rollbook_db::{DatabaseConfig, PgPool, init_db_pool};

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Seed and clear student records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database with fake students
    Seed {
        /// Number of students to create
        #[arg(short = 'c', long, default_value = "100")]
        count: usize,

        /// Courses to spread students over (comma separated)
        #[arg(long, value_delimiter = ',')]
        courses: Vec<String>,
    },
    /// Delete every student
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let Some(config) = DatabaseConfig::from_env() else {
        eprintln!("DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Seed { count, courses } => handle_seed(&pool, count, courses).await,
        Commands::Clear { yes } => handle_clear(&pool, yes).await,
    }
}

async fn handle_seed(pool: &PgPool, count: usize, courses: Vec<String>) {
    let config = SeedConfig::new(count).with_courses(courses);

    match seeder::seed_students(pool, &config).await {
        Ok(ids) => println!("Created {} students", ids.len()),
        Err(e) => {
            eprintln!("\nError seeding students: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear(pool: &PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete every student record?")
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("Aborted");
            return;
        }
    }

    match seeder::clear_students(pool).await {
        Ok(count) => println!("Deleted {} students", count),
        Err(e) => {
            eprintln!("\nError clearing students: {}", e);
            std::process::exit(1);
        }
    }
}
