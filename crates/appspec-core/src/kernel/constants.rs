/// Entry keys starting with this prefix are control flags, not data
pub const RESERVED_PREFIX: &str = "_";

/// Merge inherited entries of the same block (bool)
pub const FLAG_EXTEND: &str = "_extend";

/// Accepted spelling of [`FLAG_EXTEND`]
pub const FLAG_EXTENDS: &str = "_extends";

/// Null out every inherited entry of the block (bool)
pub const FLAG_NULLIFY_INHERITED: &str = "_nullify_inherited";

/// Type to construct for a custom object block (factory)
pub const FLAG_MAIN: &str = "_main";

/// Accepted spelling of [`FLAG_MAIN`]
pub const FLAG_MAIN_TYPE: &str = "_main_type";

/// Source location override, `file:line`
pub const FLAG_LOCATION: &str = "_location";

/// Attribute invoked by `run()` unless configured otherwise
pub const DEFAULT_RUNNER: &str = "runner";

/// Method an installer target must expose
pub const INSTALL_METHOD: &str = "install";

/// Built-in handler names
pub const HANDLER_ATTRS: &str = "attrs";
pub const HANDLER_CHECKERS: &str = "checkers";
pub const HANDLER_METHODS: &str = "methods";
pub const HANDLER_INSTALL: &str = "install";
pub const HANDLER_INSTALLERS: &str = "installers";
pub const HANDLER_COMPONENTS: &str = "components";
pub const HANDLER_REQUIRES: &str = "requires";
