mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).with_target(false).init();

    // Fail on a bad booking before spending any time reading events
    let config = Config::from_file(&args.config)?;
    tracing::info!(path = %args.config.display(), histograms = config.hists.len(), "read booking");
    let table = Table::from_file(&args.input)?;
    tracing::info!(path = %args.input.display(), events = table.len(), "read events");

    rayon::ThreadPoolBuilder::new().num_threads(args.threads).build_global()?;
    let dataflow = match args.partitions {
        Some(n) => Dataflow::new().with_partitions(n),
        None    => Dataflow::new(),
    };

    // --- Fill every booked histogram -----------------------------------------------
    let bar = ProgressBar::new(config.hists.len() as u64);
    bar.set_style(ProgressStyle::default_bar()
                  .template("Filling: {msg}\n[{elapsed_precise}] {wide_bar} {pos}/{len}")?);
    let mut filled = Vec::with_capacity(config.hists.len());
    for booking in &config.hists {
        bar.set_message(booking.name.clone());
        filled.push(fill(booking, &table, dataflow)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    // --- Report -------------------------------------------------------------------
    let report = if args.summary {
        filled.iter().map(|f| f.summary.as_str()).collect::<String>()
    } else {
        let exports = filled.into_iter().map(|f| f.export).collect::<Vec<_>>();
        serde_json::to_string_pretty(&exports)?
    };
    match &args.out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(path, report)?;
            tracing::info!(path = %path.display(), "wrote histograms");
        }
        None => println!("{report}"),
    }
    Ok(())
}

struct Filled {
    export: HistogramExport,
    summary: String,
}

/// Fill the histogram described by `booking` with every event in `table`.
fn fill(booking: &HistConfig, table: &Table, dataflow: Dataflow) -> anaquery::Result<Filled> {
    let axes = booking.axes()?;
    let column = |name: &str| table.column(name).map_err(|e| match e {
        Error::Config(message) => Error::Config(format!("histogram '{}': {message}", booking.name)),
        other => other,
    });
    let columns = axes.iter().map(|axis| column(axis.column.as_str())).collect::<anaquery::Result<Vec<_>>>()?;
    let specs   = axes.iter().map(|axis| axis.bin_spec()             ).collect::<anaquery::Result<Vec<_>>>()?;
    let weight_column = booking.weight.as_deref().map(column).transpose()?;

    let weight = |row: &Vec<Cell>| match weight_column {
        None    => Ok(1.0),
        Some(i) => row[i].scalar().ok_or_else(|| Error::Config(format!(
            "weight column of '{}' holds an array", booking.name
        ))),
    };

    let name = booking.name.as_str();
    let rows = table.rows();
    macro_rules! filled {
        ($histogram:expr) => {{
            let histogram = $histogram;
            Filled { export: histogram.export(), summary: histogram.to_string() }
        }};
    }
    Ok(match (&columns[..], &specs[..]) {
        (&[x], [sx]) => filled!(dataflow.run(
            rows,
            || Hist1D::new(name, sx),
            |h: &mut Hist1D, row: &Vec<Cell>| h.fill((row[x].observable(),), weight(row)?),
        )?),
        (&[x, y], [sx, sy]) => filled!(dataflow.run(
            rows,
            || Hist2D::new(name, sx, sy),
            |h: &mut Hist2D, row: &Vec<Cell>| h.fill((row[x].observable(), row[y].observable()), weight(row)?),
        )?),
        (&[x, y, z], [sx, sy, sz]) => filled!(dataflow.run(
            rows,
            || Hist3D::new(name, sx, sy, sz),
            |h: &mut Hist3D, row: &Vec<Cell>| {
                h.fill((row[x].observable(), row[y].observable(), row[z].observable()), weight(row)?)
            },
        )?),
        _ => return Err(Error::Config(format!("histogram '{name}' must have 1 to 3 axes"))),
    })
}
// ----- Imports -----------------------------------------------------------------------------------------
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use anaquery::{
    config::{Config, HistConfig},
    table::{Cell, Table},
    Dataflow, Error, HistogramExport, Query,
    Hist1D, Hist2D, Hist3D,
};
use cli::Cli;
