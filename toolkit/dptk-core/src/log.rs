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

pub mod logging {
    pub use tracing::{debug, error, info, trace, warn};
    use tracing_subscriber::EnvFilter;

    ///
    /// Install the process-wide tracing subscriber. Call once from a binary;
    /// later calls are no-ops so library tests can call it freely.
    ///
    /// With `debug` set, everything from `debug!` up is emitted. Otherwise we
    /// honor `RUST_LOG` and default to `info`.
    ///
    pub fn init_logging(debug: bool) {
        let filter = match debug {
            true => EnvFilter::new("debug"),
            false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

pub mod macros {
    ///
    /// Bootstraps logging for a dptk program.
    ///
    /// # Example
    /// ```
    /// use dptk_core::dptk_init_logging;
    ///
    /// dptk_init_logging!();
    /// dptk_init_logging!(true);
    /// ```
    ///
    #[macro_export]
    macro_rules! dptk_init_logging {
        ( ) => {{
            use $crate::log::logging::init_logging;
            init_logging(false);
        }};
        ( $debug:expr ) => {{
            use $crate::log::logging::init_logging;
            init_logging($debug);
        }};
    }
}
