/*
 * dptk profiles streams of textual values and infers their semantic types.
 * This toolkit aims to be reliable, simple, performant, and standards compliant.
 * Copyright (C) 2025  Luis M. Santos, M.D.
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2.1 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the Free Software
 * Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA  02110-1301  USA
 */

pub mod cli_utils {
    use crate::core::DPResult;
    use crate::strings::{format_compact, DPArrayConversions, DPString};
    use clap::Parser;
    use compact_str::CompactStringExt;
    use std::io::{stdin, stdout, Read, StdinLock, Write};

    const BUFFER_SIZE: usize = 1024 * 4;
    const BUFFER_CHUNK_SIZE: usize = 512;

    pub type BufferChunk = [u8; BUFFER_CHUNK_SIZE];

    ///
    /// Example CLI parser that can be used to paste in your binary and adjust as needed.
    ///
    /// Note, this is only an example.
    ///
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct DPTKArgs {
        ///
        /// Input file to profile. When omitted, programs read STDIN.
        ///
        #[arg(short, long)]
        file: Option<DPString>,
        ///
        /// Number of samples in the detection window.
        ///
        #[arg(short, long)]
        samples: Option<usize>,
        ///
        /// Request program runs in debug mode and log more information.
        ///
        #[arg(short, long, default_value_t = false)]
        debug: bool,
        ///
        /// Request program runs in dry run mode and simulate as many steps as possible but not commit
        /// to a critical non-reversible step.
        ///
        /// For example, if it was meant to write contents to a file, stop before doing so.
        ///
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    }

    ///
    /// Read STDIN to exhaustion. Input bytes are decoded to UTF-8 using the
    /// auto-detection machinery in [crate::strings], so delimited files in
    /// legacy encodings still profile correctly.
    ///
    pub fn read_stdin() -> DPResult<DPString> {
        let mut stdin_lock = stdin().lock();
        let mut stdin_buffer: Vec<u8> = Vec::with_capacity(BUFFER_SIZE);
        let (mut size, mut buf) = read_some_stdin(&mut stdin_lock)?;
        while size > 0 {
            stdin_buffer.extend_from_slice(&buf[..size]);
            let result = read_some_stdin(&mut stdin_lock)?;
            size = result.0;
            buf = result.1;
        }
        Ok(stdin_buffer.to_dpstring())
    }

    pub fn read_some_stdin(input: &mut StdinLock) -> DPResult<(usize, BufferChunk)> {
        let mut buf: BufferChunk = [0; BUFFER_CHUNK_SIZE];
        match input.read(&mut buf) {
            Ok(s) => Ok((s, buf)),
            Err(e) => Err(format_compact!(
                "Error reading {} bytes from STDIN: {}",
                BUFFER_CHUNK_SIZE,
                e
            )),
        }
    }

    pub fn write_stdout(data: &DPString) -> DPResult<()> {
        let mut stdout_handle = stdout();
        match stdout_handle.write_all(data.as_bytes()) {
            Ok(_) => match stdout_handle.flush() {
                Ok(_) => Ok(()),
                Err(e) => Err(format_compact!("Error flushing stdout: {}", e)),
            },
            Err(e) => Err(format_compact!("Error writing to stdout: {}", e)),
        }
    }

    pub fn print_license_notice(program: &str, year: &str, author_list: &Vec<&str>) {
        let authors = author_list.join_compact(", ");
        let notice = format_compact!(
            "  {program}  Copyright (C) {year}  {authors}
        This program comes with ABSOLUTELY NO WARRANTY; for details type `show w'.
        This is free software, and you are welcome to redistribute it
        under certain conditions; type `show c' for details."
        );
        println!("{}", notice);
    }
}

pub mod macros {
    ///
    /// Reads STDIN to exhaustion and returns the decoded text.
    ///
    /// # Example
    /// ```
    /// use dptk_core::core::DPResult;
    /// use dptk_core::strings::DPString;
    /// use crate::dptk_core::dptk_read_stdin;
    ///
    /// fn test_read_stdin() -> DPResult<DPString> {
    ///     dptk_read_stdin!()
    /// }
    ///
    /// match test_read_stdin() {
    ///     Ok(s) => (),
    ///     Err(e) => panic!("Error reading stdin because => {}", e)
    /// }
    /// ```
    ///
    #[macro_export]
    macro_rules! dptk_read_stdin {
        (  ) => {{
            use $crate::cli::cli_utils::read_stdin;
            read_stdin()
        }};
    }

    ///
    /// Writes a message to stdout and flushes.
    ///
    /// # Example
    /// ```
    /// use dptk_core::dptk_write_stdout;
    /// use dptk_core::strings::DPString;
    ///
    /// let _ = dptk_write_stdout!(&DPString::from("{}\n"));
    /// ```
    ///
    #[macro_export]
    macro_rules! dptk_write_stdout {
        ( $message:expr ) => {{
            use $crate::cli::cli_utils::write_stdout;
            write_stdout($message)
        }};
    }

    ///
    /// Prints the mandatory GPL License Notice to terminal!
    ///
    /// # Example
    /// ## Default
    /// ```
    /// use dptk_core::dptk_print_license_notice;
    ///
    /// dptk_print_license_notice!();
    /// ```
    /// ## Program Only
    /// ```
    /// use dptk_core::dptk_print_license_notice;
    ///
    /// dptk_print_license_notice!("DPTK");
    /// ```
    /// ## Program + Year
    /// ```
    /// use dptk_core::dptk_print_license_notice;
    ///
    /// dptk_print_license_notice!("DPTK", "2025");
    /// ```
    ///
    #[macro_export]
    macro_rules! dptk_print_license_notice {
        ( ) => {{
            use $crate::cli::cli_utils::print_license_notice;

            print_license_notice("DPTK", "2025", &vec!["Luis M. Santos, M.D."]);
        }};
        ( $program:expr ) => {{
            use $crate::cli::cli_utils::print_license_notice;
            print_license_notice(&$program, "2025", &vec!["Luis M. Santos, M.D."]);
        }};
        ( $program:expr, $year:expr ) => {{
            use $crate::cli::cli_utils::print_license_notice;
            print_license_notice(&$program, &$year, &vec!["Luis M. Santos, M.D."]);
        }};
        ( $program:expr, $year:expr, $authors:expr ) => {{
            use $crate::cli::cli_utils::print_license_notice;
            print_license_notice(&$program, &$year, &$authors);
        }};
    }
}
