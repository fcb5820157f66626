//! PHP source emission for a mocked class.
//!
//! The runtime mock never goes through this text; it exists so the generated
//! surface can be inspected, diffed against golden files, or written out as a
//! build-time stand-in. Output order follows declaration order.

use super::helpers::HelperTable;
use super::unique_methods;
use crate::extraction::{ClassMockSpec, MethodDescriptor};
use std::fmt::Write;

const INDENT: &str = "    ";

/// Render the mock class for `spec`. `constructor_name` is the declared
/// constructor name to emit (usually `__construct`).
pub fn render_mock_source(spec: &ClassMockSpec, helpers: &HelperTable, constructor_name: &str) -> String {
    let methods = unique_methods(spec);
    let mut out = String::new();

    let _ = writeln!(out, "class {}\n{{", spec.class_name());

    for method in &methods {
        let name = display_name(helpers, method);
        let _ = writeln!(out, "{INDENT}private static $_globalTimesCalled{name} = 0;");
        if !method.is_constructor {
            let _ = writeln!(out, "{INDENT}private static $_valueNumber{name} = 0;");
            let _ = writeln!(out, "{INDENT}private static $_values{name} = array();");
        }
        let _ = writeln!(out, "{INDENT}private static $_spy{name} = null;");
    }

    for method in &methods {
        out.push('\n');
        render_body(&mut out, helpers, method, constructor_name);
    }

    for method in &methods {
        out.push('\n');
        render_helpers(&mut out, helpers, method);
    }

    out.push('\n');
    let _ = writeln!(out, "{INDENT}public static function _resetAllGlobalCounters()\n{INDENT}{{");
    for method in &methods {
        let name = display_name(helpers, method);
        let _ = writeln!(out, "{INDENT}{INDENT}self::$_globalTimesCalled{name} = 0;");
    }
    let _ = writeln!(out, "{INDENT}}}\n}}");
    out
}

fn display_name(helpers: &HelperTable, method: &MethodDescriptor) -> String {
    helpers
        .entry(&method.key())
        .map(|e| e.display_name.clone())
        .unwrap_or_else(|| method.name.clone())
}

fn render_body(out: &mut String, helpers: &HelperTable, method: &MethodDescriptor, constructor_name: &str) {
    let name = display_name(helpers, method);
    let declared = if method.is_constructor {
        constructor_name
    } else {
        method.name.as_str()
    };
    let modifiers = if method.is_shared { "public static" } else { "public" };

    let _ = writeln!(
        out,
        "{INDENT}{modifiers} function {declared}({})\n{INDENT}{{",
        method.raw_parameter_list
    );
    let _ = writeln!(out, "{INDENT}{INDENT}self::$_globalTimesCalled{name}++;");
    if method.is_constructor {
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}if (self::$_spy{name} != null) {{ call_user_func(self::$_spy{name}); }}"
        );
    } else {
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}if (self::$_spy{name} != null) {{ call_user_func(self::$_spy{name}, func_get_args()); }}"
        );
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}if (count(self::$_values{name}) <= self::$_valueNumber{name}) {{ return null; }}"
        );
        let _ = writeln!(
            out,
            "{INDENT}{INDENT}return self::$_values{name}[self::$_valueNumber{name}++];"
        );
    }
    let _ = writeln!(out, "{INDENT}}}");
}

fn render_helpers(out: &mut String, helpers: &HelperTable, method: &MethodDescriptor) {
    let name = display_name(helpers, method);
    let _ = writeln!(
        out,
        "{INDENT}public static function _getGlobalTimesCalled{name}() {{ return self::$_globalTimesCalled{name}; }}"
    );
    let _ = writeln!(
        out,
        "{INDENT}public static function _resetGlobalTimesCalled{name}() {{ self::$_globalTimesCalled{name} = 0; }}"
    );
    if !method.is_constructor {
        let _ = writeln!(
            out,
            "{INDENT}public static function _set{name}Values(array $values) {{ self::$_values{name} = $values; self::$_valueNumber{name} = 0; }}"
        );
    }
    let _ = writeln!(
        out,
        "{INDENT}public static function _set{name}Spy(callable $spy) {{ self::$_spy{name} = $spy; }}"
    );
}
