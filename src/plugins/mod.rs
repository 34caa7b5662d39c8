//! Concrete plugins
//!
//! Each plugin renders one family of output files from the configuration:
//!
//! - [`InternalPlugin`]: the eight core files (codes, api, data, grader,
//!   opmap pairs)
//! - [`CapiPlugin`]: the flat integer-handle C boundary shim
//! - [`PybindPlugin`]: the pybind11 binding source
//! - [`RulesetPlugin`]: the rule-set grader format, replacing the internal
//!   plugin's grader pair when applied after it

pub mod capi;
pub mod internal;
pub mod pybind;
pub mod ruleset;

pub use capi::CapiPlugin;
pub use internal::InternalPlugin;
pub use pybind::PybindPlugin;
pub use ruleset::RulesetPlugin;

use crate::config::{ApiSpec, Config};
use crate::gen::{FileMap, FileRep};

/// Insert a rendered file, appending any caller-supplied extra includes for
/// its path before it lands in the map.
pub(crate) fn insert_file(map: &mut FileMap, config: &Config, fpath: String, mut rep: FileRep) {
    if let Some(extra) = config.extra_includes(&fpath) {
        rep.includes.extend(extra);
    }
    map.insert(fpath, rep);
}

/// Suffixes that make repeated API names unique in targets without overload
/// resolution: the first occurrence keeps its bare name, the k-th duplicate
/// after it gets `_k`, counted in declaration order.
pub(crate) fn overload_affixes(apis: &[ApiSpec]) -> Vec<String> {
    let mut seen: Vec<(&str, usize)> = Vec::new();
    apis.iter()
        .map(|api| {
            match seen.iter_mut().find(|(name, _)| *name == api.name) {
                Some((_, count)) => {
                    let affix = format!("_{count}");
                    *count += 1;
                    affix
                }
                None => {
                    seen.push((&api.name, 1));
                    String::new()
                }
            }
        })
        .collect()
}
