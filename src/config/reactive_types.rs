use serde::{Deserialize, Serialize};

/// Names of the framework's reactive containers and the calls that create
/// or collect them. Extending these lists is how new container types are
/// taught to the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveTypesConfig {
    #[serde(default = "default_value_holder")]
    pub value_holder: Vec<String>,

    #[serde(default = "default_mutable_value_holder")]
    pub mutable_value_holder: Vec<String>,

    #[serde(default = "default_stream")]
    pub stream: Vec<String>,

    #[serde(default = "default_hot_stream")]
    pub hot_stream: Vec<String>,

    #[serde(default = "default_mutable_hot_stream")]
    pub mutable_hot_stream: Vec<String>,

    /// Stream-to-value-holder operations (`flow.collectAsState()`).
    #[serde(default = "default_collection_operations")]
    pub collection_operations: Vec<String>,

    /// Calls that produce a fresh reactive container.
    #[serde(default = "default_creation_functions")]
    pub creation_functions: Vec<String>,

    /// Wrappers whose lambda result is the created value (`remember { ... }`).
    #[serde(default = "default_memo_wrappers")]
    pub memo_wrappers: Vec<String>,
}

impl Default for ReactiveTypesConfig {
    fn default() -> Self {
        Self {
            value_holder: default_value_holder(),
            mutable_value_holder: default_mutable_value_holder(),
            stream: default_stream(),
            hot_stream: default_hot_stream(),
            mutable_hot_stream: default_mutable_hot_stream(),
            collection_operations: default_collection_operations(),
            creation_functions: default_creation_functions(),
            memo_wrappers: default_memo_wrappers(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_value_holder() -> Vec<String> {
    strings(&["State"])
}

fn default_mutable_value_holder() -> Vec<String> {
    strings(&["MutableState", "SnapshotMutableState"])
}

fn default_stream() -> Vec<String> {
    strings(&["Flow"])
}

fn default_hot_stream() -> Vec<String> {
    strings(&["StateFlow", "SharedFlow"])
}

fn default_mutable_hot_stream() -> Vec<String> {
    strings(&["MutableStateFlow", "MutableSharedFlow"])
}

fn default_collection_operations() -> Vec<String> {
    strings(&[
        "collectAsState",
        "collectAsStateWithLifecycle",
        "observeAsState",
        "subscribeAsState",
    ])
}

fn default_creation_functions() -> Vec<String> {
    strings(&[
        "mutableStateOf",
        "mutableIntStateOf",
        "mutableLongStateOf",
        "mutableFloatStateOf",
        "mutableDoubleStateOf",
        "derivedStateOf",
        "produceState",
        "MutableStateFlow",
        "MutableSharedFlow",
        "flowOf",
        "flow",
        "stateIn",
        "shareIn",
    ])
}

fn default_memo_wrappers() -> Vec<String> {
    strings(&["remember", "rememberSaveable"])
}
