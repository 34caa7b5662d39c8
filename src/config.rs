//! Generator Configuration
//!
//! One JSON document drives a whole run. Its recognized domains:
//!
//! - `opcodes`: operation-code name to `{operation, derivative}` — both
//!   opaque C++ expressions spliced into the dispatch switches.
//! - `dtypes`: logical type name to its native C++ representation.
//! - `apis`: ordered function specs; names may repeat (overloads).
//! - `signatures`: secondary type strings (`data.in`, `data.out`, `grad.*`)
//!   consumed by the opmap and grader templates.
//! - `data`: `scalarize`/`sum` expressions for the ruleset grader format.
//! - `includes`: output path to extra include directives appended after a
//!   plugin computes its own.
//! - `pointers`: the pointer-like marker types (`unit`, `list`) used for
//!   null guards and handle flattening; defaults match the ade tensor types.
//!
//! The document is kept as a raw [`serde_json::Value`] tree so templates can
//! bind slots to dotted paths; renderers deserialize the sub-value they
//! receive into the typed views below.

use crate::gen::{GenError, GenResult};
use serde::de::{self, DeserializeOwned, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Default marker type for single pointer-like arguments.
pub const DEFAULT_POINTER_UNIT: &str = "ade::TensptrT";

/// Default marker type for pointer-list arguments.
pub const DEFAULT_POINTER_LIST: &str = "ade::TensT";

/// The parsed configuration document for one run.
#[derive(Debug, Clone)]
pub struct Config {
    root: Value,
}

impl Config {
    /// Parse a configuration document from JSON text.
    ///
    /// The root must be an object, and vocabulary domains (`opcodes`,
    /// `dtypes`) must not repeat keys: a plain mapping would collapse the
    /// duplicates silently and lose an enumerant, so the raw text is probed
    /// for repeats before the tree is accepted.
    pub fn parse_str(text: &str) -> GenResult<Self> {
        let root: Value = serde_json::from_str(text)?;
        if !root.is_object() {
            return Err(GenError::BadRoot);
        }
        let probe: VocabProbe = serde_json::from_str(text)?;
        if let Some(key) = probe.opcodes.duplicates.first() {
            return Err(GenError::DuplicateKey {
                domain: "opcodes",
                key: key.clone(),
            });
        }
        if let Some(key) = probe.dtypes.duplicates.first() {
            return Err(GenError::DuplicateKey {
                domain: "dtypes",
                key: key.clone(),
            });
        }
        Ok(Self { root })
    }

    /// Load a configuration document from a file.
    pub fn load(path: &Path) -> GenResult<Self> {
        Self::parse_str(&std::fs::read_to_string(path)?)
    }

    /// Load a configuration document from a reader (typically stdin).
    pub fn from_reader(mut reader: impl Read) -> GenResult<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse_str(&text)
    }

    /// The document tree, for dotted-path slot resolution.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Caller-supplied extra includes for one output path, if any.
    pub fn extra_includes(&self, fpath: &str) -> Option<Vec<String>> {
        let extras = self.root.get("includes")?.get(fpath)?;
        serde_json::from_value(extras.clone()).ok()
    }

    /// The registered pointer-like marker types.
    pub fn pointer_types(&self) -> PointerTypes {
        self.root
            .get("pointers")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// Pointer-like marker types: arguments of these dtypes get null guards and
/// handle flattening in the boundary shims.
#[derive(Debug, Clone, Deserialize)]
pub struct PointerTypes {
    #[serde(default = "default_pointer_unit")]
    pub unit: String,

    #[serde(default = "default_pointer_list")]
    pub list: String,
}

fn default_pointer_unit() -> String {
    DEFAULT_POINTER_UNIT.to_string()
}

fn default_pointer_list() -> String {
    DEFAULT_POINTER_LIST.to_string()
}

impl Default for PointerTypes {
    fn default() -> Self {
        Self {
            unit: default_pointer_unit(),
            list: default_pointer_list(),
        }
    }
}

/// One operation code: the expressions spliced into the execution and
/// gradient dispatch switches.
#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeSpec {
    pub operation: String,
    pub derivative: String,
}

/// One API function spec.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSpec {
    pub name: String,

    #[serde(default)]
    pub args: Vec<ArgSpec>,

    pub out: ApiOut,

    /// Template parameter list; non-empty means the definition is emitted
    /// inline in the header.
    #[serde(default)]
    pub template: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// One API argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgSpec {
    pub dtype: String,
    pub name: String,

    /// Default value, honored in declaration position only.
    #[serde(default)]
    pub default: Option<String>,

    /// Alternate flattened parameter list + conversion expression for the
    /// C boundary shim.
    #[serde(default)]
    pub c: Option<CShim>,
}

/// Flattened replacement for one argument at the C boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct CShim {
    pub args: Vec<CArg>,
    pub convert: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CArg {
    pub dtype: String,
    pub name: String,
}

/// API output: either a bare return expression, or an expression with an
/// explicit return type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiOut {
    Expr(String),
    Typed {
        #[serde(rename = "type", default)]
        type_: Option<String>,
        val: String,
    },
}

impl ApiOut {
    /// Return type to emit, falling back to the pointer unit type.
    pub fn out_type<'a>(&'a self, pointers: &'a PointerTypes) -> &'a str {
        match self {
            ApiOut::Typed { type_: Some(t), .. } => t,
            _ => &pointers.unit,
        }
    }

    /// Return expression to splice into the definition body.
    pub fn out_val(&self) -> &str {
        match self {
            ApiOut::Expr(v) => v,
            ApiOut::Typed { val, .. } => val,
        }
    }
}

/// `signatures.data`: the typed-execution signature types.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSig {
    #[serde(rename = "in")]
    pub input: String,

    pub out: DataOut,
}

/// Output half of the data signature: reference-style (`void f(out, ...)`)
/// or return-style (`out f(...)`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DataOut {
    Plain(String),
    Typed {
        #[serde(rename = "type")]
        type_: String,
        #[serde(rename = "return", default)]
        returns: bool,
    },
}

impl DataOut {
    pub fn type_name(&self) -> &str {
        match self {
            DataOut::Plain(t) => t,
            DataOut::Typed { type_, .. } => type_,
        }
    }

    pub fn returns(&self) -> bool {
        matches!(self, DataOut::Typed { returns: true, .. })
    }
}

/// `signatures.grad`: the chain-rule signature types.
#[derive(Debug, Clone, Deserialize)]
pub struct GradSig {
    #[serde(rename = "in")]
    pub input: String,

    pub out: String,

    #[serde(default)]
    pub template: String,
}

/// Deserialize the sub-value a slot resolved to, treating absence or a
/// mismatched shape as a fatal configuration error.
pub fn required<T: DeserializeOwned>(path: &'static str, value: Option<&Value>) -> GenResult<T> {
    let value = value.ok_or_else(|| GenError::MissingDomain(path.to_string()))?;
    serde_json::from_value(value.clone()).map_err(|source| GenError::BadShape {
        path: path.to_string(),
        source,
    })
}

/// Streaming probe over the raw JSON text that records repeated vocabulary
/// keys. `serde_json::Value` deduplicates object keys while parsing, so the
/// check has to happen before the tree exists.
#[derive(Deserialize)]
struct VocabProbe {
    #[serde(default)]
    opcodes: KeyProbe,

    #[serde(default)]
    dtypes: KeyProbe,
}

#[derive(Default)]
struct KeyProbe {
    duplicates: Vec<String>,
}

impl<'de> Deserialize<'de> for KeyProbe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = KeyProbe;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping with unique keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut seen: Vec<String> = Vec::new();
                let mut duplicates = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    map.next_value::<IgnoredAny>()?;
                    if seen.contains(&key) {
                        duplicates.push(key);
                    } else {
                        seen.push(key);
                    }
                }
                Ok(KeyProbe { duplicates })
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(KeyProbe::default())
            }
        }

        deserializer.deserialize_map(KeyVisitor)
    }
}
