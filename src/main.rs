use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use protrack::config::{Backend, Config};
use protrack::dates::parse_date;
use protrack::{render, GymManager, Member, Store, WorkoutPlan};

#[derive(Parser)]
#[command(name = "protrack")]
#[command(about = "Gym membership manager: members, workout plans, attendance and payments")]
struct Cli {
    /// Data file to use (defaults to the user data directory)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Storage backend: json or sqlite
    #[arg(long, global = true)]
    backend: Option<Backend>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage members
    #[command(subcommand)]
    Member(MemberCommand),
    /// Manage workout plans
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Assign a workout plan to a member
    Assign { plan_id: String, member_id: String },
    /// Clear a member's workout plan
    Unassign { member_id: String },
    /// Log a visit
    Attend {
        member_id: String,
        /// Visit date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Log a payment
    Pay {
        member_id: String,
        amount: f64,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the latest payment and paid status of every member
    Payments {
        #[arg(long)]
        today: Option<String>,
    },
    /// List members who have not paid since the cutoff
    Unpaid {
        /// Cutoff date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        cutoff: Option<String>,
    },
    /// Show the dashboard summary
    Summary {
        #[arg(long)]
        today: Option<String>,
    },
    /// Rank members by recent attendance
    Top {
        #[arg(long, default_value = "7")]
        days: u32,
        #[arg(long, default_value = "5")]
        limit: usize,
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
enum MemberCommand {
    /// Register a new member
    Add {
        member_id: String,
        name: String,
        age: u32,
        /// Join date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        joined: Option<String>,
    },
    /// Remove a member
    Remove { member_id: String },
    /// Show one member in detail
    Show { member_id: String },
    /// List all members
    List,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Create a workout plan
    Add {
        plan_id: String,
        name: String,
        focus_area: String,
        /// Comma-separated exercises
        exercises: String,
    },
    /// Remove a workout plan and unassign it from its members
    Remove { plan_id: String },
    /// List all workout plans
    List,
}

/// Logs go to stderr so stdout only carries command output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "protrack=debug"
    } else {
        "protrack=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn date_or_today(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(date) => Ok(parse_date(&date)?),
        None => Ok(today()),
    }
}

fn parse_exercises(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|ex| !ex.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run one command against the manager. Returns the text to print and
/// whether the manager changed.
fn execute(manager: &mut GymManager, command: Commands) -> Result<(String, bool)> {
    let output = match command {
        Commands::Member(MemberCommand::Add {
            member_id,
            name,
            age,
            joined,
        }) => {
            if name.trim().is_empty() {
                bail!("member name must not be empty");
            }
            let member = Member::new(member_id.trim(), name.trim(), age, date_or_today(joined)?)?;
            let id = member.member_id.clone();
            manager.register_member(member)?;
            (format!("Member {} has been registered.", id), true)
        }
        Commands::Member(MemberCommand::Remove { member_id }) => {
            let member = manager.remove_member(&member_id)?;
            (format!("Member {} ({}) removed.", member.member_id, member.name), true)
        }
        Commands::Member(MemberCommand::Show { member_id }) => {
            let member = manager.require_member(&member_id)?;
            let plan = manager.plan_for(&member_id)?;
            (render::member_detail(member, plan), false)
        }
        Commands::Member(MemberCommand::List) => (render::members(manager), false),
        Commands::Plan(PlanCommand::Add {
            plan_id,
            name,
            focus_area,
            exercises,
        }) => {
            let exercises = parse_exercises(&exercises);
            if name.trim().is_empty() || focus_area.trim().is_empty() || exercises.is_empty() {
                bail!("a plan needs a name, a focus area and at least one exercise");
            }
            let plan = WorkoutPlan::new(plan_id.trim(), name.trim(), focus_area.trim(), exercises)?;
            let id = plan.plan_id.clone();
            manager.add_workout_plan(plan)?;
            (format!("Workout plan {} has been created.", id), true)
        }
        Commands::Plan(PlanCommand::Remove { plan_id }) => {
            let plan = manager.remove_workout_plan(&plan_id)?;
            (format!("Workout plan {} ({}) removed.", plan.plan_id, plan.name), true)
        }
        Commands::Plan(PlanCommand::List) => (render::plans(manager), false),
        Commands::Assign { plan_id, member_id } => {
            manager.assign_workout_plan(&plan_id, &member_id)?;
            (format!("Workout plan {} assigned to {}.", plan_id, member_id), true)
        }
        Commands::Unassign { member_id } => {
            let plan_id = manager.unassign_workout_plan(&member_id)?;
            (format!("Workout plan {} unassigned from {}.", plan_id, member_id), true)
        }
        Commands::Attend { member_id, date } => {
            let date = date_or_today(date)?;
            manager.log_attendance(date, &member_id)?;
            (format!("Attendance logged for {} on {}.", member_id, date), true)
        }
        Commands::Pay {
            member_id,
            amount,
            date,
        } => {
            let date = date_or_today(date)?;
            manager.log_payment(&member_id, date, amount)?;
            (
                format!("Payment of {:.2} logged for {} on {}.", amount, member_id, date),
                true,
            )
        }
        Commands::Payments { today } => {
            (render::payment_log(manager, date_or_today(today)?), false)
        }
        Commands::Unpaid { cutoff } => {
            let cutoff = date_or_today(cutoff)?;
            (render::unpaid(&manager.unpaid_as_of(cutoff), cutoff), false)
        }
        Commands::Summary { today } => (render::dashboard(manager, date_or_today(today)?), false),
        Commands::Top { days, limit, today } => {
            let ranked = manager.top_attendees(date_or_today(today)?, days, limit);
            (render::top_attendees(&ranked, days), false)
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(cli.data, cli.backend)?;
    let store: Box<dyn Store> = config.open_store()?;
    let mut manager = store.load()?;

    let (output, changed) = execute(&mut manager, cli.command)?;
    if changed {
        store.save(&manager)?;
    }

    let output = output.trim_end();
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exercises_trims_and_drops_blanks() {
        assert_eq!(
            parse_exercises(" Squat, Lunge ,, "),
            vec!["Squat".to_string(), "Lunge".to_string()]
        );
    }

    #[test]
    fn read_only_commands_do_not_request_save() {
        let mut manager = GymManager::new();
        let (_, changed) = execute(&mut manager, Commands::Member(MemberCommand::List)).unwrap();
        assert!(!changed);
    }

    #[test]
    fn failed_command_leaves_manager_unchanged() {
        let mut manager = GymManager::new();
        let result = execute(
            &mut manager,
            Commands::Unassign {
                member_id: "ghost".to_string(),
            },
        );
        assert!(result.is_err());
        assert!(manager.is_empty());
    }
}
