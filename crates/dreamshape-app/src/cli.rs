use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dreamshape_core::models::workout::ActivityType;

#[derive(Parser, Debug)]
#[command(name = "dreamshape")]
#[command(about = "Workout templates, live session logging and training history")]
#[command(version)]
pub struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    /// Local data directory (overrides config and DREAMSHAPE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Workout templates
    #[command(subcommand)]
    Template(TemplateCommands),
    /// Exercise catalog
    #[command(subcommand)]
    Exercise(ExerciseCommands),
    /// The workout in progress
    #[command(subcommand)]
    Workout(WorkoutCommands),
    /// Completed workouts
    #[command(subcommand)]
    History(HistoryCommands),
    /// Dashboard statistics
    Stats {
        /// Also print the activity heatmap
        #[arg(long, default_value_t = false)]
        heatmap: bool,
    },
    /// Personal records
    Pr {
        /// Show a single exercise
        exercise: Option<String>,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Profile
    #[command(subcommand)]
    Profile(ProfileCommands),
    /// Write a JSON backup of history and profile
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Hosted account and sync
    #[command(subcommand)]
    Account(AccountCommands),
}

/// A template or workout picked by 1-based list position or by id.
pub type ItemRef = String;

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List templates
    List,
    /// Show one template
    Show { template: ItemRef },
    /// Create a template
    Create {
        name: String,
        /// Exercise name; repeat for several. Unknown names are added to the catalog.
        #[arg(long = "exercise", short = 'e')]
        exercises: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Rename a template or replace its exercises
    Update {
        template: ItemRef,
        #[arg(long)]
        name: Option<String>,
        /// Replaces the whole list when given
        #[arg(long = "exercise", short = 'e')]
        exercises: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a template
    Delete { template: ItemRef },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommands {
    /// List the catalog grouped by muscle group
    List,
    /// Search by name
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Add a custom exercise
    Add {
        name: String,
        #[arg(long, default_value = "Other")]
        muscle_group: String,
        #[arg(long, default_value = "Barbell")]
        equipment: String,
    },
    /// Remove an exercise by exact name
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
pub enum WorkoutCommands {
    /// Start from a template, or empty when none is given
    Start { template: Option<ItemRef> },
    /// Show the workout in progress
    Status,
    /// Edit a set's weight and/or reps
    Set(SetArgs),
    /// Toggle a set's completed flag
    Done { exercise: usize, set: usize },
    /// Toggle a set between warm-up and working
    Warmup { exercise: usize, set: usize },
    /// Append a set copying the previous one
    AddSet { exercise: usize },
    /// Remove a set (the last remaining set is kept)
    RemoveSet { exercise: usize, set: usize },
    /// Add an exercise by name
    AddExercise { name: String },
    /// Remove an exercise
    RemoveExercise { exercise: usize },
    /// Move an exercise to a new position
    Move { from: usize, to: usize },
    /// Set or clear an exercise's rest override
    Rest { exercise: usize, seconds: Option<u32> },
    /// Set the session's default rest
    DefaultRest { seconds: u32 },
    /// Set or clear notes for the workout or one exercise
    Notes {
        text: Option<String>,
        #[arg(long)]
        exercise: Option<usize>,
    },
    /// Run an exercise's rest countdown in the foreground
    Timer { exercise: usize },
    /// Finish and log the workout
    Finish(FinishArgs),
    /// Discard the workout
    Cancel,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    pub exercise: usize,
    pub set: usize,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub reps: Option<u32>,
}

#[derive(Args, Debug)]
pub struct FinishArgs {
    /// Overwrite the source template's exercises with this session's
    #[arg(long, conflicts_with = "save_as")]
    pub update_template: bool,
    /// Save this session's exercises as a new template
    #[arg(long)]
    pub save_as: Option<String>,
    #[arg(long, value_enum)]
    pub activity: Option<Activity>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Activity {
    Workout,
    Cardio,
    Stretching,
    Recovery,
}

impl From<Activity> for ActivityType {
    fn from(value: Activity) -> Self {
        match value {
            Activity::Workout => ActivityType::Workout,
            Activity::Cardio => ActivityType::Cardio,
            Activity::Stretching => ActivityType::Stretching,
            Activity::Recovery => ActivityType::Recovery,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List completed workouts, newest first
    List,
    /// Show one workout
    Show { workout: ItemRef },
    /// Delete a workout
    Delete { workout: ItemRef },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the profile and headline stats
    Show,
    /// Change the display name
    Rename { name: String },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Create an account (requires the invite code)
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DREAMSHAPE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        invite_code: String,
    },
    /// Sign in and sync
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DREAMSHAPE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and stop pushing changes
    SignOut,
    /// Show sign-in and sync state
    Status,
    /// Pull the latest data from the backend
    Sync,
}
