use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bentokaze_core::{
    Event, EventSink, IngredientCatalog, IngredientRecord, ModelBuilder, SolutionSummary,
    TargetSpec,
};
use bentokaze_lp::{ExportFormat, GoodLpSolver, Solver, SolutionStatus, export};

#[derive(Parser)]
#[command(name = "bentokaze")]
#[command(about = "Least-cost bento box composition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a scenario and print the optimal ingredient quantities
    Solve {
        /// JSON scenario file (ingredients, densities, targets)
        file: PathBuf,
        /// Print build-progress events to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Render a scenario's LP model to solver-interchange text
    Export {
        /// JSON scenario file
        file: PathBuf,
        /// Output format (lp, mps)
        #[arg(short, long, default_value = "lp")]
        format: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario file without solving
    Check {
        /// JSON scenario file
        file: PathBuf,
    },
}

/// On-disk scenario: the joined ingredient table, the density table, and
/// the target specification in one document.
#[derive(serde::Deserialize)]
struct Scenario {
    ingredients: Vec<IngredientRecord>,
    densities: BTreeMap<String, f64>,
    #[serde(flatten)]
    target: TargetSpec,
}

struct StderrSink;

impl EventSink for StderrSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::VariablesDefined { count } => eprintln!("defined {count} variables"),
            Event::ConstraintAdded { name } => eprintln!("added constraint {name}"),
            Event::ObjectiveSet { variables } => {
                eprintln!("objective set over {variables} variables");
            }
        }
    }
}

fn load_scenario(file: &PathBuf) -> Scenario {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&source) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Scenario error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_catalog(scenario: &Scenario) -> IngredientCatalog {
    match IngredientCatalog::new(scenario.ingredients.clone(), scenario.densities.clone()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, verbose } => {
            let scenario = load_scenario(&file);
            let catalog = build_catalog(&scenario);

            let mut sink = StderrSink;
            let mut builder = ModelBuilder::new(&catalog);
            if verbose {
                builder = builder.with_sink(&mut sink);
            }
            let problem = match build_pipeline(&mut builder, &scenario.target) {
                Ok(()) => builder.build(),
                Err(e) => {
                    eprintln!("Build error: {}", e);
                    std::process::exit(1);
                }
            };

            let solution = GoodLpSolver::new().solve(&problem);
            match solution.status {
                SolutionStatus::Optimal => {
                    println!("Status: Optimal");
                    println!();
                    println!("Ingredients:");
                    for (name, &quantity) in &solution.assignment {
                        if quantity > 0.001 {
                            println!("  {:20} {:10.3}", name, quantity);
                        }
                    }

                    let summary = match SolutionSummary::derive(&solution, &catalog) {
                        Ok(s) => s,
                        Err(e) => {
                            eprintln!("Derivation error: {}", e);
                            std::process::exit(1);
                        }
                    };
                    println!();
                    println!("Nutrition:");
                    for (nutrient, total) in &summary.nutrition {
                        println!("  {:20} {:10.3}", nutrient, total);
                    }
                    println!();
                    println!("Total volume: {:.3}", summary.total_volume);
                    println!("Total cost:   {:.2}", summary.total_cost);
                }
                SolutionStatus::Infeasible => {
                    println!("Status: Infeasible");
                    println!("No composition satisfies all constraints.");
                    std::process::exit(1);
                }
                SolutionStatus::Unbounded => {
                    println!("Status: Unbounded");
                    println!("The model has no finite optimal cost.");
                    std::process::exit(1);
                }
                SolutionStatus::NotSolved | SolutionStatus::Undefined => {
                    println!("Status: {}", solution.status);
                    println!("The solver did not reach a conclusive answer.");
                    std::process::exit(1);
                }
            }
        }
        Commands::Export {
            file,
            format,
            output,
        } => {
            let scenario = load_scenario(&file);
            let catalog = build_catalog(&scenario);

            let format: ExportFormat = match format.parse() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Export error: {}", e);
                    std::process::exit(1);
                }
            };
            let problem = match ModelBuilder::build_full(&catalog, &scenario.target) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Build error: {}", e);
                    std::process::exit(1);
                }
            };
            let text = export(&problem, format);

            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, text) {
                        eprintln!("Error writing {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", text),
            }
        }
        Commands::Check { file } => {
            let scenario = load_scenario(&file);
            let catalog = build_catalog(&scenario);
            if let Err(e) = scenario.target.validate() {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }

            println!("✓ {} is valid", file.display());
            println!("  {} ingredients", catalog.len());
            println!("  {} categories", catalog.categories().len());
            println!("  {} nutrient columns", catalog.nutrient_columns().len());
            println!("  {} nutrient targets", scenario.target.targets.len());
        }
    }
}

fn build_pipeline(
    builder: &mut ModelBuilder<'_>,
    target: &TargetSpec,
) -> Result<(), bentokaze_core::BuildError> {
    builder.define_variables()?;
    builder.add_nutrient_constraints(target)?;
    builder.add_volume_constraint(target.max_volume)?;
    builder.add_category_mass_constraints(target.min_mass_per_category)?;
    builder.set_objective()?;
    Ok(())
}
