//! JavaScript emitted around wrapped modules.

use crate::error::Result;

/// Registry, resolver and memoizing `require` shared by every wrapped module.
///
/// `__EXTENSIONS__` is replaced with the JSON array of probe extensions and
/// `__ROOT__` with the project root, so that relative and absolute `require`
/// calls inside a module resolve the same way the walker resolved them.
const RUNTIME_PRELUDE: &str = r#"var __modules__ = {};
var __module_cache__ = {};
var __extensions__ = __EXTENSIONS__;
var __root__ = __ROOT__;
function __register__(id, factory) {
  __modules__[id] = factory;
}
function __resolve__(from, ref) {
  var first = ref.charAt(0);
  if (first !== "." && first !== "/") return ref;
  var parts;
  if (first === ".") {
    parts = from.split("/");
    parts.pop();
  } else if (ref.indexOf(__root__ + "/") === 0) {
    parts = [];
    ref = ref.slice(__root__.length + 1);
  } else {
    parts = [""];
  }
  ref.split("/").forEach(function (part) {
    if (part === "..") parts.pop();
    else if (part !== "." && part !== "") parts.push(part);
  });
  var base = parts.join("/");
  if (__modules__[base]) return base;
  for (var i = 0; i < __extensions__.length; i++) {
    if (__modules__[base + __extensions__[i]]) return base + __extensions__[i];
  }
  for (var j = 0; j < __extensions__.length; j++) {
    var index = (base ? base + "/" : "") + "index" + __extensions__[j];
    if (__modules__[index]) return index;
  }
  return base;
}
function require(id) {
  var cached = __module_cache__[id];
  if (cached) return cached.exports;
  var factory = __modules__[id];
  if (!factory) throw new Error("Module not found: " + id);
  var module = (__module_cache__[id] = { exports: {} });
  factory(module, module.exports, function (ref) {
    return require(__resolve__(id, ref));
  });
  return module.exports;
}"#;

const HYDRATION_BOOTSTRAP: &str = r#"(function () {
  var boot = function () {
    var entry = require(__ENTRY__);
    if (entry && typeof entry.hydrate === "function") {
      entry.hydrate(document.getElementById("root"));
    }
  };
  if (document.readyState === "loading") {
    document.addEventListener("DOMContentLoaded", boot);
  } else {
    boot();
  }
})();"#;

/// Quote `value` as a JavaScript string literal.
pub(crate) fn js_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// `root` is the project root in module-id form (`/` separators, no
/// trailing slash).
pub(crate) fn runtime_prelude(extensions: &[String], root: &str) -> Result<String> {
    Ok(RUNTIME_PRELUDE
        .replace("__EXTENSIONS__", &serde_json::to_string(extensions)?)
        .replace("__ROOT__", &js_string(root)?))
}

/// Wrap one module's source in a registration call.
pub(crate) fn register_module(id: &str, source: &str) -> Result<String> {
    Ok(format!(
        "__register__({}, function (module, exports, require) {{\n{source}\n}});",
        js_string(id)?
    ))
}

pub(crate) fn entry_require(id: &str) -> Result<String> {
    Ok(format!("require({});", js_string(id)?))
}

/// Script that requires the entry once the DOM is ready and calls its
/// `hydrate(rootElement)` export if it has one.
pub(crate) fn hydration_bootstrap(entry_id: &str) -> Result<String> {
    Ok(HYDRATION_BOOTSTRAP.replace("__ENTRY__", &js_string(entry_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("src/a.js").unwrap(), r#""src/a.js""#);
        assert_eq!(js_string(r#"we"ird\name"#).unwrap(), r#""we\"ird\\name""#);
    }

    #[test]
    fn test_prelude_embeds_extensions() {
        let prelude = runtime_prelude(&[".js".to_string(), ".ts".to_string()], "/app").unwrap();
        assert!(prelude.contains(r#"var __extensions__ = [".js",".ts"];"#));
        assert!(prelude.contains(r#"var __root__ = "/app";"#));
        assert!(prelude.contains("var __modules__ = {};"));
        assert!(prelude.contains("Module not found: "));
        assert!(!prelude.contains("__EXTENSIONS__"));
        assert!(!prelude.contains("__ROOT__"));
    }

    #[test]
    fn test_register_module() {
        let chunk = register_module("src/a.js", "exports.a = 1;").unwrap();
        assert_eq!(
            chunk,
            "__register__(\"src/a.js\", function (module, exports, require) {\nexports.a = 1;\n});"
        );
    }

    #[test]
    fn test_hydration_bootstrap() {
        let script = hydration_bootstrap("src/app.js").unwrap();
        assert!(script.contains(r#"require("src/app.js")"#));
        assert!(script.contains("DOMContentLoaded"));
        assert!(script.contains(r#"document.getElementById("root")"#));
    }
}
