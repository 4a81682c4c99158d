use clap::Parser;
use hwpx_fill::{Field, LayoutConstants};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hwpx-fill", about = "Fill the fields of an HWPX certificate template")]
struct Args {
    /// Input HWPX template
    input: PathBuf,
    /// Output HWPX file (defaults to <input>.filled.hwpx)
    output: Option<PathBuf>,
    /// Field edit as FIELD=VALUE, e.g. address=서울특별시 강남구 ... (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_edit)]
    edits: Vec<(Field, String)>,
    /// Print the fields found in the template and exit
    #[arg(long)]
    print_fields: bool,
}

fn parse_edit(arg: &str) -> Result<(Field, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let field: Field = name.trim().parse().map_err(|e: hwpx_fill::Error| e.to_string())?;
    if !field.is_editable() {
        return Err(format!("field '{field}' cannot be edited"));
    }
    Ok((field, value.to_string()))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    if !args.input.is_file() {
        eprintln!("Error: not a file: {}", args.input.display());
        std::process::exit(1);
    }

    if args.print_fields {
        match hwpx_fill::read_fields(&args.input) {
            Ok(fields) => {
                for field in Field::ALL {
                    println!("{field}: {}", fields.get(field));
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("filled.hwpx"));

    let constants = LayoutConstants::default();
    if let Err(e) = hwpx_fill::fill_hwpx(&args.input, &output, &args.edits, &constants) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
