use changeviz_core::{GraphConfig, GraphSnapshot};
use changeviz_render::svg::{SvgRenderOptions, render_svg};
use changeviz_render::{InteractionMediator, LayoutConfig, PointerEvent, layout_snapshot};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CHANGEVIZ_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Snapshot(changeviz_core::Error),
    Layout(changeviz_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Snapshot(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<changeviz_core::Error> for CliError {
    fn from(value: changeviz_core::Error) -> Self {
        Self::Snapshot(value)
    }
}

impl From<changeviz_render::Error> for CliError {
    fn from(value: changeviz_render::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
    Interact,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    overrides: Vec<(&'static str, Value)>,
    pretty: bool,
    diagram_id: Option<String>,
    highlight: Vec<String>,
    events: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "changeviz-cli\n\
\n\
USAGE:\n\
  changeviz-cli [layout] [--pretty] [<layout-opts>] [<path>|-]\n\
  changeviz-cli render [--id <diagram-id>] [--highlight <change-id>]... [--out <path>] [<layout-opts>] [<path>|-]\n\
  changeviz-cli interact --events <path> [<layout-opts>] [<path>|-]\n\
\n\
LAYOUT OPTIONS:\n\
  --config <path>       JSON config (layout.xScale, layout.yScale, layout.radius, layout.rowHeight,\n\
                        layout.nodeRadius, theme.normal, theme.conflict, theme.background,\n\
                        panel.emptyDescription)\n\
  --x-scale <n>         overrides layout.xScale\n\
  --y-scale <n>         overrides layout.yScale\n\
  --radius <n>          overrides layout.radius\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the snapshot JSON is read from stdin.\n\
  - layout prints the render model as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - interact replays a JSON array of pointer events and prints one outbound event per line.\n\
  - Set CHANGEVIZ_LOG (e.g. CHANGEVIZ_LOG=debug) to see layout diagnostics on stderr.\n\
"
}

fn parse_number(it: &mut dyn Iterator<Item = &String>) -> Result<Value, CliError> {
    let Some(raw) = it.next() else {
        return Err(CliError::Usage(usage()));
    };
    let n = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "interact" => args.command = Command::Interact,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--x-scale" => {
                let v = parse_number(&mut it)?;
                args.overrides.push(("layout.xScale", v));
            }
            "--y-scale" => {
                let v = parse_number(&mut it)?;
                args.overrides.push(("layout.yScale", v));
            }
            "--radius" => {
                let v = parse_number(&mut it)?;
                args.overrides.push(("layout.radius", v));
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--highlight" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.highlight.push(id.clone());
            }
            "--events" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.events = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Interact) && args.events.is_none() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load_layout_config(args: &Args) -> Result<LayoutConfig, CliError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => GraphConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => GraphConfig::empty_object(),
    };
    let mut flags = GraphConfig::empty_object();
    for (path, value) in &args.overrides {
        flags.set_value(path, value.clone());
    }
    cfg.deep_merge(flags.as_value());
    Ok(LayoutConfig::from_config(&cfg)?)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_layout_config(&args)?;
    let text = read_input(args.input.as_deref())?;
    let snapshot = GraphSnapshot::from_json_str(&text)?;
    let model = layout_snapshot(&snapshot, &config)?;

    match args.command {
        Command::Layout => write_json(&model, args.pretty),
        Command::Render => {
            let options = SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                highlighted: args.highlight.clone(),
                ..SvgRenderOptions::default()
            };
            let svg = render_svg(&model, &config, &options);
            write_text(&svg, args.out.as_deref())
        }
        Command::Interact => {
            let Some(path) = args.events.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let events: Vec<PointerEvent> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            let mut mediator = InteractionMediator::new(&model);
            for event in &events {
                if let Some(out) = mediator.handle(event) {
                    tracing::info!(?out, "interaction event");
                    write_json(&out, false)?;
                }
            }
            Ok(())
        }
    }
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
