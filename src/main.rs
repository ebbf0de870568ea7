use clap::{Parser, Subcommand};
use symint::{
  Expr, Notation, Rulebook, Solver, SolverConfig, VariableSet, render,
};
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Integrate an expression, e.g. "int(x^2 + 3, x)"
  Solve {
    /// Expression to solve
    expression: String,
    /// Treat the expression as an integrand over this variable
    #[arg(long)]
    var: Option<String>,
    /// Write explanation steps in plain notation instead of LaTeX
    #[arg(long)]
    plain: bool,
    /// Print the result and explanation tree as JSON
    #[arg(long)]
    json: bool,
    /// Only print the result
    #[arg(long)]
    no_trace: bool,
  },
  /// List the integration strategies in the order they are tried
  Strategies,
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => Level::WARN,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  };
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_writer(std::io::stderr)
    .init();
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match cli.command {
    Commands::Solve {
      expression,
      var,
      plain,
      json,
      no_trace,
    } => {
      let mut vars = VariableSet::new();
      let expr = match var {
        Some(var) => Expr::Integral(symint::parse_integral(
          &expression,
          &var,
          &mut vars,
        )?),
        None => symint::parse(&expression, &mut vars)?,
      };

      let config = SolverConfig {
        notation: if plain { Notation::Plain } else { Notation::Latex },
        ..SolverConfig::default()
      };
      let solver = Solver::new(Rulebook::standard(), config);
      let solution = solver.solve(&expr, &mut vars)?;

      if json {
        let output = serde_json::json!({
          "result": render::plain(&solution.result),
          "latex": render::latex(&solution.result),
          "solved": solution.is_solved(),
          "trace": solution.log,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
      } else {
        if !no_trace {
          print!("{}", solution.trace);
          println!();
        }
        println!("{}", solution.result);
      }
    }
    Commands::Strategies => {
      for (i, strategy) in Rulebook::standard().strategies().iter().enumerate()
      {
        println!(
          "{}. {} ({}): {}",
          i + 1,
          strategy.name(),
          strategy.description(),
          strategy.example()
        );
      }
    }
  }

  Ok(())
}
