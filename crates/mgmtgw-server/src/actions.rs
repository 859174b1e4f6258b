//! The table of backend actions exposed as RPCs.
//!
//! Adding an action means adding an entry here and a handler that passes it
//! to [`crate::dispatch::ActionDispatcher::invoke`].

/// How the request's `input` object is presented to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Sent as `input`.
    Generic,
    /// Renamed to `<module>:input`.
    Namespaced,
    /// Renamed to the given key.
    Keyed(&'static str),
}

/// One backend action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    /// Action URI, `/<module>:<action>`.
    pub uri: &'static str,
    pub input: InputShape,
    /// Key holding the result in the backend's reply; `<module>:output` when unset.
    pub output_key: Option<&'static str>,
}

impl ActionSpec {
    /// The YANG module prefix of the URI.
    pub fn module(&self) -> &'static str {
        let uri = self.uri.trim_start_matches('/');
        uri.split_once(':').map_or(uri, |(module, _)| module)
    }

    /// The key the request's `input` object is moved to, if renamed.
    pub fn input_key(&self) -> Option<String> {
        match self.input {
            InputShape::Generic => None,
            InputShape::Namespaced => Some(format!("{}:input", self.module())),
            InputShape::Keyed(key) => Some(key.to_string()),
        }
    }

    /// The key the reply carries its result under.
    pub fn output_key(&self) -> String {
        self.output_key
            .map_or_else(|| format!("{}:output", self.module()), str::to_string)
    }
}

pub const COPY_CONFIG: ActionSpec = ActionSpec {
    uri: "/sonic-config-mgmt:copy",
    input: InputShape::Generic,
    output_key: None,
};

pub const SHOW_TECHSUPPORT: ActionSpec = ActionSpec {
    uri: "/sonic-show-techsupport:sonic-show-techsupport-info",
    input: InputShape::Keyed("sonic-show-techsupport-info:input"),
    output_key: None,
};

pub const SUM: ActionSpec = ActionSpec {
    uri: "/sonic-tests:sum",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const IMAGE_INSTALL: ActionSpec = ActionSpec {
    uri: "/sonic-image-management:image-install",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const IMAGE_REMOVE: ActionSpec = ActionSpec {
    uri: "/sonic-image-management:image-remove",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const IMAGE_DEFAULT: ActionSpec = ActionSpec {
    uri: "/sonic-image-management:image-default",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const CLEAR_NEIGHBORS: ActionSpec = ActionSpec {
    uri: "/sonic-neighbor:clear-neighbors",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const GET_AUDIT_LOG: ActionSpec = ActionSpec {
    uri: "/sonic-auditlog:get-auditlog",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const CLEAR_AUDIT_LOG: ActionSpec = ActionSpec {
    uri: "/sonic-auditlog:clear-auditlog",
    input: InputShape::Namespaced,
    output_key: None,
};

pub const SAVE_CONFIG: ActionSpec = ActionSpec {
    uri: "/sonic-config-mgmt:save_config",
    input: InputShape::Keyed("save_config:input"),
    output_key: Some("save_config:output"),
};

pub const RELOAD_CONFIG: ActionSpec = ActionSpec {
    uri: "/sonic-config-mgmt:reload_config",
    input: InputShape::Keyed("reload_config:input"),
    output_key: Some("reload_config:output"),
};

pub const LOAD_MGMT_CONFIG: ActionSpec = ActionSpec {
    uri: "/sonic-config-mgmt:load_mgmt_config",
    input: InputShape::Keyed("load_mgmt_config:input"),
    output_key: Some("load_mgmt_config:output"),
};

pub const LOAD_MINIGRAPH: ActionSpec = ActionSpec {
    uri: "/sonic-config-mgmt:load_minigraph",
    input: InputShape::Keyed("load_minigraph:input"),
    output_key: Some("load_minigraph:output"),
};

/// Every action, for listing and validation.
pub const ALL: &[ActionSpec] = &[
    COPY_CONFIG,
    SHOW_TECHSUPPORT,
    SUM,
    IMAGE_INSTALL,
    IMAGE_REMOVE,
    IMAGE_DEFAULT,
    CLEAR_NEIGHBORS,
    GET_AUDIT_LOG,
    CLEAR_AUDIT_LOG,
    SAVE_CONFIG,
    RELOAD_CONFIG,
    LOAD_MGMT_CONFIG,
    LOAD_MINIGRAPH,
];
