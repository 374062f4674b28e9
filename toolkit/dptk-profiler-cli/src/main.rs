/*
 *     dptk profiles streams of textual values and infers their semantic types.
 *     This toolkit aims to be reliable, simple, performant, and standards compliant.
 *     Copyright (C) 2025  Luis M. Santos, M.D.
 *
 *     This program is free software: you can redistribute it and/or modify
 *     it under the terms of the GNU General Public License as published by
 *     the Free Software Foundation, either version 3 of the License, or
 *     (at your option) any later version.
 *
 *     This program is distributed in the hope that it will be useful,
 *     but WITHOUT ANY WARRANTY; without even the implied warranty of
 *     MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *     GNU General Public License for more details.
 *
 *     You should have received a copy of the GNU General Public License
 *     along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;
use csv::ReaderBuilder;
use dptk_core::core::DPResult;
use dptk_core::strings::{format_compact, DPArrayConversions, DPString};
use dptk_core::{dptk_init_logging, dptk_read_stdin, dptk_serialize, dptk_write_stdout};
use dptk_profiler::profile_analyzer::column_profiler::ColumnProfiler;
use dptk_profiler::profile_dates::format_detector::DateResolution;
use dptk_profiler::profile_result::profile_result::ProfileResult;
use std::fs;

///
/// Column Profiler CLI
///
/// Reads delimited text from a file or STDIN, profiles every column with its
/// own analyzer, and prints the JSON profile list to STDOUT.
///
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct DPTKProfilerArgs {
    ///
    /// Input file. When omitted, the program reads STDIN to exhaustion.
    ///
    #[arg(short, long)]
    file: Option<DPString>,
    ///
    /// Field delimiter used by the input.
    ///
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,
    ///
    /// Treat the first row as data rather than column names.
    ///
    #[arg(long, default_value_t = false)]
    no_header: bool,
    ///
    /// Resolve ambiguous day/month fields day-first.
    ///
    #[arg(long, default_value_t = false)]
    day_first: bool,
    ///
    /// Resolve ambiguous day/month fields month-first.
    ///
    #[arg(long, default_value_t = false)]
    month_first: bool,
    ///
    /// Detection window size. Must be at least 20.
    ///
    #[arg(short, long)]
    samples: Option<usize>,
    ///
    /// Locale tag driving month names and number symbols, e.g. en_US.
    ///
    #[arg(short, long)]
    locale: Option<DPString>,
    ///
    /// Pretty print the JSON output.
    ///
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
    ///
    /// Request program runs in debug mode and log more information.
    ///
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn resolution(args: &DPTKProfilerArgs) -> DateResolution {
    match (args.day_first, args.month_first) {
        (true, _) => DateResolution::DayFirst,
        (_, true) => DateResolution::MonthFirst,
        _ => DateResolution::Auto,
    }
}

fn read_input(args: &DPTKProfilerArgs) -> DPResult<DPString> {
    match &args.file {
        Some(path) => match fs::read(path.as_str()) {
            Ok(bytes) => Ok(bytes.to_dpstring()),
            Err(e) => Err(format_compact!("Error reading {}: {}", path, e)),
        },
        None => dptk_read_stdin!(),
    }
}

fn new_profiler(name: &str, args: &DPTKProfilerArgs) -> DPResult<ColumnProfiler> {
    let mut profiler = ColumnProfiler::new(name, resolution(args));
    if let Some(samples) = args.samples {
        profiler.set_sample_size(samples)?;
    }
    if let Some(locale) = &args.locale {
        profiler.set_locale(locale)?;
    }
    Ok(profiler)
}

fn profile_input(text: &str, args: &DPTKProfilerArgs) -> DPResult<Vec<ProfileResult>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(args.delimiter as u8)
        .has_headers(!args.no_header)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut profilers: Vec<ColumnProfiler> = Vec::new();
    if !args.no_header {
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => return Err(format_compact!("Error reading header row: {}", e)),
        };
        for name in headers.iter() {
            profilers.push(new_profiler(name, args)?);
        }
    }

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => return Err(format_compact!("Error reading record: {}", e)),
        };
        while profilers.len() < record.len() {
            let name = format_compact!("column_{}", profilers.len() + 1);
            profilers.push(new_profiler(name.as_str(), args)?);
        }
        for (i, profiler) in profilers.iter_mut().enumerate() {
            // A missing or empty field trains as a null sample.
            let sample = match record.get(i) {
                Some(value) if !value.is_empty() => Some(value),
                _ => None,
            };
            profiler.train(sample)?;
        }
    }

    let mut results: Vec<ProfileResult> = Vec::with_capacity(profilers.len());
    for profiler in profilers.iter_mut() {
        results.push(profiler.get_result()?);
    }
    Ok(results)
}

fn run(args: &DPTKProfilerArgs) -> DPResult<DPString> {
    let text = read_input(args)?;
    let results = profile_input(&text, args)?;
    let rendered = dptk_serialize!(&results, args.pretty)?;
    Ok(DPString::from(rendered))
}

fn main() {
    let args = DPTKProfilerArgs::parse();
    dptk_init_logging!(args.debug);
    match run(&args) {
        Ok(report) => {
            let _ = dptk_write_stdout!(&report);
            println!();
        }
        Err(e) => {
            eprintln!("dptk-profiler-cli: {}", e);
            std::process::exit(1);
        }
    }
}

/*****************************************Tests****************************************/
#[cfg(test)]
mod tests {
    use super::*;

    const DELIMITED_SAMPLE: &str = "\
id,active,when
1,true,9:57
2,false,10:04
3,true,11:15
";

    fn default_args() -> DPTKProfilerArgs {
        DPTKProfilerArgs {
            file: None,
            delimiter: ',',
            no_header: false,
            day_first: false,
            month_first: false,
            samples: None,
            locale: None,
            pretty: false,
            debug: false,
        }
    }

    #[test]
    fn test_profile_delimited_input() {
        let args = default_args();
        let results = profile_input(DELIMITED_SAMPLE, &args).unwrap();
        assert_eq!(results.len(), 3, "One profile per column expected!");
        assert_eq!(results[0].name, "id", "Wrong column name!");
        assert_eq!(results[1].semantic_type, "Boolean", "Wrong type for booleans!");
        assert_eq!(results[2].semantic_type, "LocalTime", "Wrong type for times!");
    }

    #[test]
    fn test_profile_headerless_input() {
        let mut args = default_args();
        args.no_header = true;
        let results = profile_input("1,x\n2,y\n", &args).unwrap();
        assert_eq!(results.len(), 2, "One profile per column expected!");
        assert_eq!(results[0].name, "column_1", "Wrong synthesized column name!");
    }

    #[test]
    fn test_render_json() {
        let args = default_args();
        let results = profile_input(DELIMITED_SAMPLE, &args).unwrap();
        let rendered = dptk_serialize!(&results, true).unwrap();
        assert!(
            rendered.contains("semantic_type"),
            "JSON report must carry the inferred types!"
        );
    }
}
