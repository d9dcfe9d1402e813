//! JavaScript fragment assembly.
//!
//! Pure string manipulation; the fragments produced here are executed by a
//! [`ScriptExecutor`](crate::ScriptExecutor) elsewhere.

use serde_json::Value;

use crate::object::EnumerationScope;

/// The WebDriver argument slot at `index`.
pub(crate) fn arg_slot(index: usize) -> String {
    format!("arguments[{index}]")
}

/// Comma-separated argument slots for `count` arguments starting at `base`.
pub(crate) fn arg_slots(base: usize, count: usize) -> String {
    (base..base + count)
        .map(arg_slot)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether `name` works with dot notation.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Encodes `s` as a JavaScript string literal.
pub(crate) fn js_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

/// Member access expression for `name` on `root`.
///
/// Dot notation for plain identifiers, a quoted subscript for everything
/// else. Names already written as a subscript (e.g. `"[2]"`) are appended
/// verbatim.
pub(crate) fn member(root: &str, name: &str) -> String {
    if name.starts_with('[') {
        format!("{root}{name}")
    } else if is_identifier(name) {
        format!("{root}.{name}")
    } else {
        format!("{root}[{}]", js_string(name))
    }
}

/// Type-based filter applied to enumerated property names.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NameFilter {
    Any,
    Callable,
    NotCallable,
}

impl NameFilter {
    fn clause(self, root: &str) -> String {
        match self {
            NameFilter::Any => String::new(),
            NameFilter::Callable => {
                format!(".filter(p => typeof {root}[p] === \"function\")")
            }
            NameFilter::NotCallable => {
                format!(".filter(p => typeof {root}[p] !== \"function\")")
            }
        }
    }
}

/// Expression yielding the property names of `root` under `scope`.
fn names_expr(root: &str, scope: EnumerationScope) -> String {
    match scope {
        EnumerationScope::Own => format!("Object.getOwnPropertyNames({root})"),
        EnumerationScope::All => format!(
            "(() => {{\n    \
                let names = new Set();\n    \
                let current = {root};\n    \
                do {{\n        \
                    Object.getOwnPropertyNames(current).map(p => names.add(p));\n    \
                }} while ((current = Object.getPrototypeOf(current)));\n    \
                return [...names.keys()];\n\
            }})()"
        ),
        EnumerationScope::Depth(depth) => format!(
            "(() => {{\n    \
                let names = new Set();\n    \
                let current = {root};\n    \
                let depth = {depth};\n    \
                do {{\n        \
                    Object.getOwnPropertyNames(current).map(p => names.add(p));\n    \
                }} while (depth-- > 0 && (current = Object.getPrototypeOf(current)));\n    \
                return [...names.keys()];\n\
            }})()"
        ),
    }
}

/// Enumeration script returning the property names of `root`, filtered
/// browser-side so a single round trip suffices.
pub(crate) fn names(root: &str, scope: EnumerationScope, filter: NameFilter) -> String {
    format!("return {}{}", names_expr(root, scope), filter.clause(root))
}

/// One-round-trip read of `path` reporting the value's kind next to it.
///
/// `null` gets its own kind so the host side never mistakes it for an
/// object. Object- and function-typed values are left unserialized; forcing
/// them through the driver's JSON clone would fail on anything cyclic.
pub(crate) fn probe(path: &str) -> String {
    format!(
        "return (() => {{\n    \
            const value = {path};\n    \
            const kind = value === null ? \"null\" : typeof value;\n    \
            if (kind === \"object\" || kind === \"function\") {{\n        \
                return {{ kind: kind }};\n    \
            }}\n    \
            return {{ kind: kind, value: value }};\n\
        }})()"
    )
}

/// Invocation of `path` with `count` argument slots starting at `base`.
pub(crate) fn call(path: &str, base: usize, count: usize) -> String {
    format!("return {path}({})", arg_slots(base, count))
}

/// Snapshot script collecting `[name, value]` pairs for the data properties
/// of `root`, in the browser's enumeration order.
pub(crate) fn snapshot(root: &str, scope: EnumerationScope) -> String {
    format!(
        "return (() => {{\n    \
            const target = {root};\n    \
            const pairs = [];\n    \
            for (const name of {names}) {{\n        \
                const value = target[name];\n        \
                if (typeof value === \"function\") continue;\n        \
                try {{ JSON.stringify(value); }} catch (e) {{ continue; }}\n        \
                pairs.push([name, value]);\n    \
            }}\n    \
            return pairs;\n\
        }})()",
        names = names_expr(root, scope),
    )
}

/// Statement binding `new class(...)` to `window.var`.
pub(crate) fn construct(class: &str, var: &str, count: usize) -> String {
    format!("window.{var} = new {class}({})", arg_slots(0, count))
}
