use std::path::PathBuf;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use yw_report::Replacer;

pub struct ReplaceArgs<'a> {
    pub files: &'a [PathBuf],
    pub objects: &'a [String],
    pub probabilities: &'a [f64],
    pub existing: &'a [String],
    pub prefix: &'a str,
    pub seed: Option<u64>,
}

pub fn run(args: &ReplaceArgs<'_>) -> Result<(), String> {
    let replacer = Replacer::new(
        args.objects.to_vec(),
        args.probabilities,
        args.existing.to_vec(),
    )
    .map_err(|e| e.to_string())?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for file in args.files {
        let done = replacer
            .replace_file(file, args.prefix, &mut rng)
            .map_err(|e| format!("cannot rewrite {}: {e}", file.display()))?;
        println!(
            "  Wrote {} {}",
            done.output.display(),
            format!(
                "({} objects now among {})",
                done.swaps,
                args.objects.join(", ")
            )
            .dimmed()
        );
    }
    Ok(())
}
