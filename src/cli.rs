use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::ArgAction;
use menagerie::{Identity, Repository, Role, Zoo};
use owo_colors::OwoColorize;
use uuid::Uuid;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the registry snapshot
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Supported output formats for listings.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Manage habitat zones
    #[command(subcommand)]
    Zone(ZoneCommand),

    /// Manage species
    #[command(subcommand)]
    Species(SpeciesCommand),

    /// Manage animals
    #[command(subcommand)]
    Animal(AnimalCommand),

    /// Post to and read animal walls
    #[command(subcommand)]
    Comment(CommentCommand),

    /// Keyword search across zones, species, animals, and comments
    Search(Search),

    /// Aggregate reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Manage registry users
    #[command(subcommand)]
    User(UserCommand),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Zone(command) => command.run(root),
            Self::Species(command) => command.run(root),
            Self::Animal(command) => command.run(root),
            Self::Comment(command) => command.run(root),
            Self::Search(command) => command.run(root),
            Self::Report(command) => command.run(root),
            Self::User(command) => command.run(root),
        }
    }
}

fn open(root: &Path) -> anyhow::Result<(Repository, Zoo)> {
    let repository = Repository::new(root.to_path_buf());
    let zoo = repository.load()?;
    Ok((repository, zoo))
}

fn emit<T: serde::Serialize>(records: &[T], output: OutputFormat, line: impl Fn(&T) -> String) -> anyhow::Result<()> {
    match output {
        OutputFormat::Table => {
            for record in records {
                println!("{}", line(record));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
    }
    Ok(())
}

#[derive(Debug, clap::Subcommand)]
pub enum ZoneCommand {
    /// Create a zone
    Add {
        /// Zone name
        name: String,
    },
    /// Rename a zone
    Edit {
        /// Zone identifier
        id: Uuid,
        /// New zone name
        name: String,
    },
    /// Delete a zone (refused while animals live in it)
    Remove {
        /// Zone identifier
        id: Uuid,
    },
    /// List zones with their species and animals
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

impl ZoneCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (repository, mut zoo) = open(root)?;
        match self {
            Self::Add { name } => {
                let id = zoo.create_zone(&name)?;
                repository.save(&zoo)?;
                println!("{} zone {id}", "created".green());
            }
            Self::Edit { id, name } => {
                zoo.edit_zone(id, &name)?;
                repository.save(&zoo)?;
                println!("{} zone {id}", "updated".green());
            }
            Self::Remove { id } => {
                zoo.delete_zone(id)?;
                repository.save(&zoo)?;
                println!("{} zone {id}", "deleted".red());
            }
            Self::List { output } => {
                let zones = zoo.all_zones()?;
                emit(&zones, output, |zone| {
                    format!(
                        "{}  {} ({} species, {} animals)",
                        zone.id,
                        zone.name.bold(),
                        zone.species.len(),
                        zone.animals.len()
                    )
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum SpeciesCommand {
    /// Create a species inside a zone
    Add {
        /// Species name
        name: String,
        /// Name of the owning zone
        #[arg(long)]
        zone: String,
    },
    /// Rename a species and reassign its zone
    Edit {
        /// Species identifier
        id: Uuid,
        /// New species name
        name: String,
        /// Name of the (possibly unchanged) owning zone
        #[arg(long)]
        zone: String,
    },
    /// Delete a species (refused while it has animals)
    Remove {
        /// Species identifier
        id: Uuid,
    },
    /// List species with their zone and animals
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

impl SpeciesCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (repository, mut zoo) = open(root)?;
        match self {
            Self::Add { name, zone } => {
                let id = zoo.create_species(&name, &zone)?;
                repository.save(&zoo)?;
                println!("{} species {id}", "created".green());
            }
            Self::Edit { id, name, zone } => {
                zoo.edit_species(id, &name, &zone)?;
                repository.save(&zoo)?;
                println!("{} species {id}", "updated".green());
            }
            Self::Remove { id } => {
                zoo.delete_species(id)?;
                repository.save(&zoo)?;
                println!("{} species {id}", "deleted".red());
            }
            Self::List { output } => {
                let species = zoo.all_species()?;
                emit(&species, output, |entry| {
                    format!(
                        "{}  {} in {} ({} animals)",
                        entry.id,
                        entry.name.bold(),
                        entry.zone,
                        entry.animals.len()
                    )
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum AnimalCommand {
    /// Admit an animal under a species
    Add {
        /// Animal name
        name: String,
        /// Name of the owning species
        #[arg(long)]
        species: String,
        /// Admission timestamp (RFC 3339); defaults to now
        #[arg(long)]
        admitted: Option<DateTime<Utc>>,
    },
    /// Rename an animal and reassign its species
    Edit {
        /// Animal identifier
        id: Uuid,
        /// New animal name
        name: String,
        /// Name of the (possibly unchanged) owning species
        #[arg(long)]
        species: String,
    },
    /// Delete an animal together with its wall
    Remove {
        /// Animal identifier
        id: Uuid,
    },
    /// List animals with their species and comments
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

impl AnimalCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (repository, mut zoo) = open(root)?;
        match self {
            Self::Add {
                name,
                species,
                admitted,
            } => {
                let id = zoo.create_animal(&name, &species, admitted)?;
                repository.save(&zoo)?;
                println!("{} animal {id}", "admitted".green());
            }
            Self::Edit { id, name, species } => {
                zoo.edit_animal(id, &name, &species)?;
                repository.save(&zoo)?;
                println!("{} animal {id}", "updated".green());
            }
            Self::Remove { id } => {
                zoo.delete_animal(id)?;
                repository.save(&zoo)?;
                println!("{} animal {id}", "deleted".red());
            }
            Self::List { output } => {
                let animals = zoo.all_animals()?;
                emit(&animals, output, |animal| {
                    format!(
                        "{}  {} ({}, admitted {})",
                        animal.id,
                        animal.name.bold(),
                        animal.species,
                        animal.admitted.format("%Y-%m-%d")
                    )
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum CommentCommand {
    /// Post a comment (or a reply) on an animal's wall
    Add {
        /// Comment body
        content: String,
        /// Name of the animal whose wall to post on
        #[arg(long)]
        animal: String,
        /// Verified email of the author
        #[arg(long)]
        author: String,
        /// Identifier of the comment being replied to
        #[arg(long)]
        parent: Option<Uuid>,
    },
    /// Show an animal's wall as a thread tree
    Wall {
        /// Animal name
        animal: String,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

impl CommentCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (repository, mut zoo) = open(root)?;
        match self {
            Self::Add {
                content,
                animal,
                author,
                parent,
            } => {
                // The CLI stands in for the credential collaborator: the
                // author flag is taken as an already-verified identity.
                let identity = Identity::resolved(&author, Role::Staff)?;
                let id = zoo.add_comment(&content, &animal, &identity, parent)?;
                repository.save(&zoo)?;
                println!("{} comment {id}", "posted".green());
            }
            Self::Wall { animal, output } => {
                let wall = zoo.wall(&animal)?;
                match output {
                    OutputFormat::Table => {
                        for node in &wall {
                            print_thread(node, 0);
                        }
                    }
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&wall)?);
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_thread(node: &menagerie::ThreadNode, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} — {}",
        node.posted.format("%Y-%m-%d %H:%M").dimmed(),
        node.author.bold(),
        node.content
    );
    for reply in &node.replies {
        print_thread(reply, depth + 1);
    }
}

#[derive(Debug, clap::Parser)]
pub struct Search {
    /// Keyword to look for (case-insensitive substring)
    keyword: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Search {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_repository, zoo) = open(root)?;
        let hits = zoo.search(&self.keyword);
        if hits.is_empty() {
            println!("no results for '{}'", self.keyword);
            return Ok(());
        }
        match self.output {
            OutputFormat::Table => {
                for hit in &hits {
                    match hit {
                        menagerie::Hit::Zone { zone } => {
                            println!("{}     {zone}", "ZONE".bold());
                        }
                        menagerie::Hit::Species { zone, species } => {
                            println!("{}  {species} ({zone})", "SPECIES".bold());
                        }
                        menagerie::Hit::Animal {
                            zone,
                            species,
                            animal,
                        } => {
                            println!("{}   {animal} ({species}, {zone})", "ANIMAL".bold());
                        }
                        menagerie::Hit::Comment {
                            animal, comment, ..
                        } => {
                            println!("{}  on {animal}: {comment}", "COMMENT".bold());
                        }
                        menagerie::Hit::Reply {
                            animal,
                            comment,
                            reply,
                            ..
                        } => {
                            println!("{}    on {animal}: {comment} <- {reply}", "REPLY".bold());
                        }
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
        }
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum ReportCommand {
    /// Animal head-counts per zone
    Zones {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Animal head-counts per species
    Species {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Animals admitted on a given date (UTC)
    Admissions {
        /// The date, e.g. 2024-03-01
        date: NaiveDate,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Share of root comments that have at least one reply
    ReplyRatio,
}

impl ReportCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (_repository, zoo) = open(root)?;
        match self {
            Self::Zones { output } => {
                let census = zoo.animals_by_zone()?;
                emit(&census, output, |entry| {
                    format!("{}  {}", entry.animals.to_string().bold(), entry.zone)
                })?;
            }
            Self::Species { output } => {
                let census = zoo.animals_by_species()?;
                emit(&census, output, |entry| {
                    format!("{}  {}", entry.animals.to_string().bold(), entry.species)
                })?;
            }
            Self::Admissions { date, output } => {
                let admissions = zoo.admitted_on(date)?;
                emit(&admissions, output, |entry| {
                    format!("{} ({}, {})", entry.animal.bold(), entry.species, entry.zone)
                })?;
            }
            Self::ReplyRatio => {
                println!("{}", zoo.reply_ratio().bold());
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum UserCommand {
    /// Register a staff user
    Add {
        /// Display name
        name: String,
        /// Email address (stored lowercased)
        #[arg(long)]
        email: String,
        /// Credential secret, as produced by the credential collaborator
        #[arg(long)]
        secret: String,
    },
    /// List registered users
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
}

impl UserCommand {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let (repository, mut zoo) = open(root)?;
        match self {
            Self::Add {
                name,
                email,
                secret,
            } => {
                let id = zoo.register_staff(&name, &email, &secret)?;
                repository.save(&zoo)?;
                println!("{} user {id}", "registered".green());
            }
            Self::List { output } => {
                let users = zoo.users()?;
                emit(&users, output, |user| {
                    format!("{}  {} <{}> ({})", user.id, user.name.bold(), user.email, user.role)
                })?;
            }
        }
        Ok(())
    }
}
