//! Summaries of istanbul-style coverage reports.
//!
//! The report maps source paths to hit counters:
//!
//! ```json
//! {"contracts/MUSD.sol": {"s": {"1": 3}, "b": {"1": [1, 0]}, "f": {"1": 0}}}
//! ```
//!
//! Components whose name contains `Mock` or `Test` are left out.
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Components listed separately in the summary.
pub const CORE_COMPONENTS: &[&str] = &[
    "BLEBridgeV9",
    "BorrowModule",
    "CollateralVault",
    "DirectMintV2",
    "MUSD",
    "TreasuryV2",
    "LeverageVault",
    "LiquidationEngine",
    "PriceOracle",
    "SMUSD",
    "RedemptionQueue",
    "InterestRateModel",
];

const EXCLUDED_MARKERS: &[&str] = &["Mock", "Test"];

#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse coverage report")]
    Parse(#[from] serde_json::Error),
}

/// Hit counters of one source file. Other istanbul keys are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FileCoverage {
    #[serde(default, rename = "s")]
    pub statements: BTreeMap<String, u64>,
    #[serde(default, rename = "b")]
    pub branches: BTreeMap<String, Vec<u64>>,
    #[serde(default, rename = "f")]
    pub functions: BTreeMap<String, u64>,
}

/// Covered and total counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ratio {
    pub hit: usize,
    pub total: usize,
}

impl Ratio {
    fn of<'a>(counters: impl IntoIterator<Item = &'a u64>) -> Self {
        counters.into_iter().fold(Self::default(), |acc, &hits| Self {
            hit: acc.hit + usize::from(hits > 0),
            total: acc.total + 1,
        })
    }

    /// `hit / total * 100`, or zero if there is nothing to cover.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hit as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSummary {
    pub name: String,
    pub statements: Ratio,
    pub branches: Ratio,
    pub functions: Ratio,
}

impl ComponentSummary {
    pub fn new(name: impl Into<String>, file: &FileCoverage) -> Self {
        Self {
            name: name.into(),
            statements: Ratio::of(file.statements.values()),
            branches: Ratio::of(file.branches.values().flatten()),
            functions: Ratio::of(file.functions.values()),
        }
    }

    pub fn is_core(&self) -> bool {
        CORE_COMPONENTS.contains(&self.name.as_str())
    }
}

/// File name without directories and the `.sol` extension.
pub fn component_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".sol").unwrap_or(file)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverageReport {
    /// Ordered by source path.
    pub components: Vec<ComponentSummary>,
}

impl CoverageReport {
    pub fn from_json(json: &str) -> Result<Self, CoverageError> {
        let files: BTreeMap<String, FileCoverage> = serde_json::from_str(json)?;

        let components = files
            .iter()
            .filter_map(|(path, file)| {
                let name = component_name(path);
                if EXCLUDED_MARKERS.iter().any(|m| name.contains(m)) {
                    tracing::debug!(%path, "Skipping excluded component");
                    return None;
                }
                Some(ComponentSummary::new(name, file))
            })
            .collect();

        Ok(Self { components })
    }

    pub fn from_path(path: &Path) -> Result<Self, CoverageError> {
        let json = std::fs::read_to_string(path).map_err(|source| CoverageError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn get(&self, name: &str) -> Option<&ComponentSummary> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn core(&self) -> impl Iterator<Item = &ComponentSummary> {
        self.components.iter().filter(|c| c.is_core())
    }
}

fn row(f: &mut fmt::Formatter<'_>, name_width: usize, c: &ComponentSummary) -> fmt::Result {
    write!(
        f,
        "{:<name_width$} {:>6.1}% {:>7.1}% {:>7.1}%",
        c.name,
        c.statements.percent(),
        c.branches.percent(),
        c.functions.percent()
    )
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(78);
        writeln!(f, "{:<50} {:>8} {:>8} {:>8}", "Contract", "Stmts", "Branch", "Funcs")?;
        writeln!(f, "{rule}")?;
        for component in &self.components {
            row(f, 50, component)?;
            if component.is_core() {
                write!(f, " <<<")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{rule}")?;

        writeln!(f, "\n=== Core components ===\n")?;
        for component in self.core() {
            write!(f, "  ")?;
            row(f, 45, component)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
