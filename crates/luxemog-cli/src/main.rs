use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use luxemog_cli::Args;
use luxemog_codec::{read_all, read_one, PrettyStyle, Writer};
use luxemog_rule::RuleList;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let rules = load_transforms(args)?;
    let mut trees = load_source(args)?;

    if args.verbose {
        eprintln!(
            "applying {} rule(s){} to {} document(s)",
            rules.len(),
            if args.reverse { " (reversed)" } else { "" },
            trees.len()
        );
    }
    for tree in &mut trees {
        rules
            .apply(tree, args.reverse)
            .context("Error performing transformation")?;
    }

    write_output(args, &trees)
}

fn load_transforms(args: &Args) -> Result<RuleList> {
    let text = std::fs::read_to_string(&args.transforms).with_context(|| {
        format!("Failed to open TRANSFORMS file {}", args.transforms.display())
    })?;
    let root = read_one(&text)
        .with_context(|| format!("Error loading TRANSFORMS from {}", args.transforms.display()))?;
    let rules = RuleList::build(&root)
        .with_context(|| format!("Error loading TRANSFORMS from {}", args.transforms.display()))?;
    if args.verbose {
        eprintln!("loaded {} rule(s) from {}", rules.len(), args.transforms.display());
    }
    Ok(rules)
}

fn load_source(args: &Args) -> Result<Vec<luxemog_value::Value>> {
    let text = if args.source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Error loading SOURCE from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.source)
            .with_context(|| format!("Failed to open SOURCE file {}", args.source))?
    };
    read_all(&text).with_context(|| format!("Error loading SOURCE from {}", args.source))
}

fn write_output(args: &Args, trees: &[luxemog_value::Value]) -> Result<()> {
    let mut writer = Writer::new();
    if !args.minimize {
        writer.set_pretty(PrettyStyle {
            indent_char: if args.use_spaces { ' ' } else { '\t' },
            indent_count: args.indent_count,
        });
    }
    let output = writer.write_all(trees);

    if args.out == "-" {
        println!("{output}");
        Ok(())
    } else {
        std::fs::write(&args.out, output).with_context(|| format!("Error writing to {}", args.out))
    }
}
