//! Error reporting for the `tipjar` binaries.

use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt, iter};
use tipjar::TipJarError;

/// Renders reports as a single line of deduplicated causes.
///
/// When the chain contains a [`TipJarError`], the alert the interactive session would show for it
/// is printed underneath. With `TIPJAR_DEBUG` set every report goes to the `color-eyre` handler
/// instead.
#[derive(Default)]
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

/// Collects the messages of `error` and its sources, dropping any message already contained in
/// the one before it.
///
/// `failed to connect: network error: timeout; network error: timeout` becomes
/// `failed to connect: network error: timeout`.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut causes: Vec<String> = iter::successors(Some(error), |err| (*err).source())
        .map(|cause| cause.to_string().trim().to_string())
        .collect();
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// The user-facing alert of the first [`TipJarError`] in the chain.
pub fn alert(error: &(dyn Error + 'static)) -> Option<&'static str> {
    iter::successors(Some(error), |err| (*err).source())
        .find_map(|err| err.downcast_ref::<TipJarError>())
        .map(TipJarError::alert)
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dedup_chain(error).iter().format(": "))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        write!(f, "{}", dedup_chain(error).iter().format("\n  caused by: "))?;
        if let Some(alert) = alert(error) {
            write!(f, "\n\n{alert}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Installs the `eyre` report hook and the `color-eyre` panic hook.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section("This is a bug in tipjar. Please report it with the output above.")
        .into_hooks();
    panic_hook.install();

    let verbose = std::env::var_os("TIPJAR_DEBUG").is_some();
    let eyre_hook = eyre_hook.into_eyre_hook();
    let installed = eyre::set_hook(Box::new(move |err| {
        Box::new(Handler { verbose: verbose.then(|| eyre_hook(err)) })
    }));
    if let Err(err) = installed {
        debug!(%err, "eyre hook already installed");
    }
}
