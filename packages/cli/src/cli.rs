use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "restart", version)]
#[command(about = "Restart Creative contest client", long_about = None)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Answer yes to every delete confirmation
    #[arg(short, long, global = true, env = "RESTART_ASSUME_YES")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with an administrator account
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: Option<String>,

        /// Request administrator rights
        #[arg(long)]
        admin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Me,

    /// Browse theme weeks and their materials
    Weeks {
        #[command(subcommand)]
        command: WeekCommand,
    },

    /// Manage contest content (administrators only)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
pub enum WeekCommand {
    /// List all theme weeks with contest totals
    List,

    /// Show one week with its winners and other materials
    Show { id: String },

    /// Open the week's result video in the browser
    Open { id: String },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Collection totals
    Dashboard,

    Users {
        #[command(subcommand)]
        command: UserCommand,
    },

    Weeks {
        #[command(subcommand)]
        command: AdminWeekCommand,
    },

    Videos {
        #[command(subcommand)]
        command: VideoCommand,
    },

    Materials {
        #[command(subcommand)]
        command: MaterialCommand,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
    Add,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum AdminWeekCommand {
    List,

    Add {
        /// Illustration to upload instead of typing an image URL
        #[arg(long)]
        image: Option<PathBuf>,
    },

    Edit {
        id: String,

        /// Replace the illustration with this file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum VideoCommand {
    List,
    Add,
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum MaterialCommand {
    List,

    Add {
        /// File to upload for image, pdf and video materials
        #[arg(long)]
        file: Option<PathBuf>,
    },

    Delete { id: String },

    /// Flip the winner flag of a material
    Winner { id: String },
}
