//! Templates and slot rendering
//!
//! A [`Template`] is a fixed textual skeleton with named holes, each hole
//! bound to exactly one slot renderer. Holes are spelled `@name@` in the
//! skeleton; the complete set of bindings is supplied to the constructor,
//! which fails if the skeleton and the bindings do not match one-to-one.
//! Rendering resolves each slot's dotted path against the configuration
//! tree, invokes its renderer on the resolved value, and splices the result
//! into the skeleton. Rendering is pure: the same configuration always
//! yields the same text.

use super::{GenError, GenResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// A vocabulary keyed by unique identifier, stored in code-point key order.
pub type Vocab<T> = BTreeMap<String, T>;

/// Resolve a dotted path against a configuration tree.
///
/// Walks one segment at a time; a missing segment yields `None` ("absent")
/// rather than an error. Each slot renderer defines its own behavior on
/// absent input.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Enumerate a vocabulary in its deterministic emission order.
///
/// Every artifact that enumerates `opcodes` or `dtypes` must walk the keys
/// in lexicographic order, so that implicitly-numbered enumerants and the
/// lookup tables built from them stay positionally aligned across files.
/// `BTreeMap` stores keys in exactly that order; this helper names the
/// contract at every enumeration site.
pub fn ordered<T>(vocab: &Vocab<T>) -> impl Iterator<Item = (&String, &T)> {
    vocab.iter()
}

/// A slot renderer: resolved sub-value in, spliced text out.
///
/// Boxed so template constructors can close over run-scoped parameters
/// (pointer marker types, for one) while each call stays a pure function of
/// the resolved value.
pub type RenderFn = Box<dyn Fn(Option<&Value>) -> GenResult<String>>;

/// One named hole binding: hole name, dotted configuration path, renderer.
pub struct Slot {
    pub name: &'static str,
    pub path: &'static str,
    pub render: RenderFn,
}

impl Slot {
    pub fn new(
        name: &'static str,
        path: &'static str,
        render: impl Fn(Option<&Value>) -> GenResult<String> + 'static,
    ) -> Self {
        Self {
            name,
            path,
            render: Box::new(render),
        }
    }
}

/// A named output artifact: skeleton text plus its complete slot set.
///
/// Immutable after construction; [`Template::render`] is the only operation.
pub struct Template {
    name: &'static str,
    ext: &'static str,
    skeleton: &'static str,
    slots: Vec<Slot>,
}

impl Template {
    /// Build a template, validating that every `@hole@` in the skeleton has
    /// a bound slot and every slot is referenced at least once.
    pub fn new(
        name: &'static str,
        ext: &'static str,
        skeleton: &'static str,
        slots: Vec<Slot>,
    ) -> GenResult<Self> {
        let holes = scan_holes(name, skeleton)?;
        for hole in &holes {
            if !slots.iter().any(|s| s.name == *hole) {
                return Err(GenError::UnboundHole {
                    template: name.to_string(),
                    hole: hole.to_string(),
                });
            }
        }
        for slot in &slots {
            if !holes.contains(&slot.name) {
                return Err(GenError::UnusedSlot {
                    template: name.to_string(),
                    slot: slot.name.to_string(),
                });
            }
        }
        Ok(Self {
            name,
            ext,
            skeleton,
            slots,
        })
    }

    /// Canonical output path of the rendered artifact, e.g. `codes.hpp`.
    pub fn fpath(&self) -> String {
        format!("{}{}", self.name, self.ext)
    }

    /// Fill every hole against the given configuration tree.
    pub fn render(&self, root: &Value) -> GenResult<String> {
        let mut out = String::with_capacity(self.skeleton.len());
        let mut rest = self.skeleton;
        while let Some(start) = rest.find('@') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('@').ok_or_else(|| GenError::UnterminatedHole {
                template: self.name.to_string(),
            })?;
            let hole = &after[..end];
            // Guaranteed present by construction-time validation.
            let slot = self
                .slots
                .iter()
                .find(|s| s.name == hole)
                .ok_or_else(|| GenError::UnboundHole {
                    template: self.name.to_string(),
                    hole: hole.to_string(),
                })?;
            let resolved = resolve_path(root, slot.path);
            out.push_str(&(slot.render)(resolved)?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Collect the distinct hole names referenced by a skeleton.
fn scan_holes(name: &str, skeleton: &'static str) -> GenResult<Vec<&'static str>> {
    let mut holes = Vec::new();
    let mut rest = skeleton;
    while let Some(start) = rest.find('@') {
        let after = &rest[start + 1..];
        let end = after.find('@').ok_or_else(|| GenError::UnterminatedHole {
            template: name.to_string(),
        })?;
        let hole = &after[..end];
        if !holes.contains(&hole) {
            holes.push(hole);
        }
        rest = &after[end + 1..];
    }
    Ok(holes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_nested_path() {
        let root = json!({"signatures": {"grad": {"out": "T"}}});
        let grad = resolve_path(&root, "signatures.grad").unwrap();
        assert_eq!(grad["out"], "T");
        assert_eq!(resolve_path(&root, "signatures.grad.out"), Some(&json!("T")));
    }

    #[test]
    fn test_resolve_absent_segment() {
        let root = json!({"signatures": {}});
        assert_eq!(resolve_path(&root, "signatures.grad"), None);
        assert_eq!(resolve_path(&root, "missing.grad.out"), None);
    }

    #[test]
    fn test_resolve_through_non_object() {
        let root = json!({"signatures": "flat"});
        assert_eq!(resolve_path(&root, "signatures.grad"), None);
    }

    #[test]
    fn test_ordered_is_lexicographic() {
        let vocab: Vocab<u32> = serde_json::from_value(json!({
            "OP3": 3, "OP1": 1, "OP2": 2
        }))
        .unwrap();
        let keys: Vec<&str> = ordered(&vocab).map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["OP1", "OP2", "OP3"]);
    }

    fn echo(value: Option<&Value>) -> GenResult<String> {
        Ok(value.and_then(Value::as_str).unwrap_or("<absent>").to_string())
    }

    #[test]
    fn test_render_fills_holes() {
        let tmpl = Template::new(
            "demo",
            ".txt",
            "a=@a@ b=@b@",
            vec![Slot::new("a", "vals.a", echo), Slot::new("b", "vals.b", echo)],
        )
        .unwrap();
        let root = json!({"vals": {"a": "1", "b": "2"}});
        assert_eq!(tmpl.render(&root).unwrap(), "a=1 b=2");
        assert_eq!(tmpl.fpath(), "demo.txt");
    }

    #[test]
    fn test_render_is_idempotent() {
        let tmpl = Template::new("demo", ".txt", "x=@x@", vec![Slot::new("x", "x", echo)]).unwrap();
        let root = json!({"x": "v"});
        let first = tmpl.render(&root).unwrap();
        let second = tmpl.render(&root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_repeated_hole() {
        let tmpl = Template::new(
            "demo",
            ".txt",
            "@x@ and @x@",
            vec![Slot::new("x", "x", echo)],
        )
        .unwrap();
        assert_eq!(tmpl.render(&json!({"x": "v"})).unwrap(), "v and v");
    }

    #[test]
    fn test_absent_value_reaches_renderer() {
        let tmpl = Template::new("demo", ".txt", "@x@", vec![Slot::new("x", "no.such", echo)])
            .unwrap();
        assert_eq!(tmpl.render(&json!({})).unwrap(), "<absent>");
    }

    #[test]
    fn test_unbound_hole_is_construction_error() {
        let err = Template::new("demo", ".txt", "@x@ @y@", vec![Slot::new("x", "x", echo)])
            .err()
            .unwrap();
        match err {
            GenError::UnboundHole { template, hole } => {
                assert_eq!(template, "demo");
                assert_eq!(hole, "y");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unused_slot_is_construction_error() {
        let err = Template::new(
            "demo",
            ".txt",
            "@x@",
            vec![Slot::new("x", "x", echo), Slot::new("y", "y", echo)],
        )
        .err()
        .unwrap();
        assert!(matches!(err, GenError::UnusedSlot { .. }));
    }

    #[test]
    fn test_unterminated_hole_is_construction_error() {
        let err = Template::new("demo", ".txt", "@x", vec![]).err().unwrap();
        assert!(matches!(err, GenError::UnterminatedHole { .. }));
    }
}
