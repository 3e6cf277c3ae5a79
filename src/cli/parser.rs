use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for guardshift
/// Shift scheduling and QR-scan attendance for security-guard deployments
#[derive(Parser)]
#[command(
    name = "guardshift",
    version = env!("CARGO_PKG_VERSION"),
    about = "Shift scheduling and QR-scan attendance tracking backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print results (and errors) as JSON
    #[arg(global = true, long = "json")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Schedule cell owner: a named employee or an anonymous joker slot.
#[derive(Args, Clone, Copy, Debug)]
#[group(required = true, multiple = false)]
pub struct SlotArgs {
    #[arg(long = "employee", help = "Employee id")]
    pub employee: Option<i64>,

    #[arg(long = "joker", help = "Joker slot number (1, 2, ...)")]
    pub joker: Option<i64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Register an employee
    AddEmployee {
        /// Full name
        name: String,
    },

    /// Activate or deactivate an employee
    SetActive {
        /// Employee id
        employee: i64,

        #[arg(long = "inactive", help = "Deactivate instead of activating")]
        inactive: bool,
    },

    /// Register a project (deployment site)
    AddProject {
        /// Project name
        name: String,
    },

    /// Add a shift type to a project
    AddShift {
        /// Project id
        project: i64,

        /// Display name (e.g. "Day", "Night")
        name: String,

        #[arg(long = "start", help = "Window start (HH:MM[:SS])")]
        start: String,

        #[arg(long = "end", help = "Window end (HH:MM[:SS]); earlier than start crosses midnight")]
        end: String,

        #[arg(long = "overtime", help = "Overtime (mesai) type instead of a regular one")]
        overtime: bool,

        #[arg(long = "hours", help = "Planned hours (default: window length)")]
        hours: Option<f64>,

        #[arg(long = "rank", help = "Position in the toggle cycle (default: last)")]
        rank: Option<i64>,
    },

    /// List the shift types of a project in toggle order
    Shifts {
        /// Project id
        project: i64,
    },

    /// Process a QR scan (entry or exit)
    Scan {
        /// Project id
        project: i64,

        /// Employee id
        employee: i64,

        /// entry | exit (in | out)
        kind: String,

        #[arg(long = "at", help = "Scan instant (YYYY-MM-DD HH:MM[:SS]); default: now")]
        at: Option<String>,
    },

    /// Cycle (or set) the regular shift of a schedule cell
    Toggle {
        /// Project id
        project: i64,

        /// Date (YYYY-MM-DD)
        date: String,

        #[command(flatten)]
        slot: SlotArgs,

        #[arg(long = "shift", help = "Jump to this shift type id instead of cycling")]
        shift: Option<i64>,
    },

    /// Cycle (or set, or clear) the overtime shift of a schedule cell
    Overtime {
        /// Project id
        project: i64,

        /// Date (YYYY-MM-DD)
        date: String,

        #[command(flatten)]
        slot: SlotArgs,

        #[arg(long = "shift", help = "Jump to this overtime type id instead of cycling")]
        shift: Option<i64>,

        #[arg(long = "clear", conflicts_with = "shift", help = "Remove the overtime")]
        clear: bool,
    },

    /// Assign or clear a leave on a schedule cell
    Leave {
        /// Project id
        project: i64,

        /// Date (YYYY-MM-DD)
        date: String,

        #[command(flatten)]
        slot: SlotArgs,

        #[arg(
            long = "type",
            help = "annual | sick | excused | unpaid | compensatory (omit to clear)"
        )]
        leave: Option<String>,
    },

    /// Show the schedule of a project for one day
    Schedule {
        /// Project id
        project: i64,

        /// Date (YYYY-MM-DD); default: today
        date: Option<String>,
    },

    /// List attendance sessions for one day
    List {
        /// Date (YYYY-MM-DD); default: today
        date: Option<String>,

        #[arg(long = "project", help = "Only this project")]
        project: Option<i64>,
    },

    /// Run one reconciliation sweep over open sessions
    Reconcile {
        #[arg(long = "at", help = "Sweep as of this instant; default: now")]
        at: Option<String>,
    },

    /// Mark scheduled employees without any session as absent
    Absences {
        /// Date (YYYY-MM-DD); default: today
        date: Option<String>,
    },

    /// Run the background reconciler and absence sweeper until Ctrl-C
    Serve,

    /// Print the attendance history or the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "employee", help = "Only history of this employee")]
        employee: Option<i64>,

        #[arg(long = "limit", default_value_t = 50, help = "Maximum history rows")]
        limit: usize,
    },
}
