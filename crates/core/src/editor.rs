//! Editor definitions: process-wide descriptors of a field's editing behavior.
//!
//! An [`EditorDefinition`] is built once and read-only afterwards. Its
//! factories hand out value converters and configuration providers: the
//! instance assigned at construction when there is one, otherwise a newly
//! allocated default. Created instances are never cached, since every field
//! using the same editor can carry a different configuration.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::configuration::{ConfigurationProvider, DefaultConfigurationProvider};
use crate::converter::{DefaultValueConverter, ValueConverter};
use crate::error::{EditorError, Result};
use crate::instance::Instance;
use crate::types::{ConfigurationMap, ValueType};

/// Icon used when a definition does not name one.
pub const DEFAULT_ICON: &str = "icon-autofill";

/// Group used when a definition does not name one.
pub const DEFAULT_GROUP: &str = "common";

/// Immutable descriptor of a property editor, identified by its alias.
///
/// Two definitions are equal iff their aliases are equal.
pub struct EditorDefinition {
    alias: String,
    name: String,
    icon: String,
    group: String,
    is_parameter_editor: bool,
    is_deprecated: bool,
    value_type: ValueType,
    view: String,
    hide_label: bool,
    value_converter: Option<Box<dyn ValueConverter>>,
    configuration_provider: Option<Box<dyn ConfigurationProvider>>,
}

impl EditorDefinition {
    /// Start building a definition.
    pub fn builder(alias: impl Into<String>, name: impl Into<String>) -> EditorDefinitionBuilder {
        EditorDefinitionBuilder::new(alias, name)
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Category used to group editors.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Whether the editor can also edit macro parameters.
    pub fn is_parameter_editor(&self) -> bool {
        self.is_parameter_editor
    }

    /// A deprecated editor is only offered where it is already in use.
    pub fn is_deprecated(&self) -> bool {
        self.is_deprecated
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn hide_label(&self) -> bool {
        self.hide_label
    }

    /// The converter assigned at construction, if any.
    pub fn assigned_value_converter(&self) -> Option<&dyn ValueConverter> {
        self.value_converter.as_deref()
    }

    /// The configuration provider assigned at construction, if any.
    pub fn assigned_configuration_provider(&self) -> Option<&dyn ConfigurationProvider> {
        self.configuration_provider.as_deref()
    }

    /// The assigned converter, or a new [`DefaultValueConverter`] built from
    /// this definition's metadata.
    pub fn base_value_converter(&self) -> Instance<'_, dyn ValueConverter> {
        match self.value_converter.as_deref() {
            Some(assigned) => Instance::Assigned(assigned),
            None => {
                debug!(alias = %self.alias, "creating default value converter");
                Instance::Created(Box::new(DefaultValueConverter::from_definition(self)))
            }
        }
    }

    /// The assigned provider, or a new empty [`DefaultConfigurationProvider`].
    pub fn base_configuration_provider(&self) -> Instance<'_, dyn ConfigurationProvider> {
        match self.configuration_provider.as_deref() {
            Some(assigned) => Instance::Assigned(assigned),
            None => Instance::Created(Box::new(DefaultConfigurationProvider::new())),
        }
    }
}

impl PartialEq for EditorDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.alias == other.alias
    }
}

impl Eq for EditorDefinition {}

impl Hash for EditorDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alias.hash(state);
    }
}

impl fmt::Debug for EditorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorDefinition")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("is_parameter_editor", &self.is_parameter_editor)
            .finish()
    }
}

/// Collects the fields of an [`EditorDefinition`] before it is frozen.
pub struct EditorDefinitionBuilder {
    alias: String,
    name: String,
    icon: String,
    group: String,
    is_parameter_editor: bool,
    is_deprecated: bool,
    value_type: ValueType,
    view: String,
    hide_label: bool,
    value_converter: Option<Box<dyn ValueConverter>>,
    configuration_provider: Option<Box<dyn ConfigurationProvider>>,
}

impl EditorDefinitionBuilder {
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
            icon: DEFAULT_ICON.to_string(),
            group: DEFAULT_GROUP.to_string(),
            is_parameter_editor: false,
            is_deprecated: false,
            value_type: ValueType::default(),
            view: String::new(),
            hide_label: false,
            value_converter: None,
            configuration_provider: None,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    #[must_use]
    pub fn parameter_editor(mut self, is_parameter_editor: bool) -> Self {
        self.is_parameter_editor = is_parameter_editor;
        self
    }

    #[must_use]
    pub fn deprecated(mut self, is_deprecated: bool) -> Self {
        self.is_deprecated = is_deprecated;
        self
    }

    #[must_use]
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    #[must_use]
    pub fn hide_label(mut self, hide_label: bool) -> Self {
        self.hide_label = hide_label;
        self
    }

    /// Use this converter instead of creating a default one per request.
    #[must_use]
    pub fn value_converter(mut self, converter: Box<dyn ValueConverter>) -> Self {
        self.value_converter = Some(converter);
        self
    }

    /// Use this provider instead of creating an empty one per request.
    #[must_use]
    pub fn configuration_provider(mut self, provider: Box<dyn ConfigurationProvider>) -> Self {
        self.configuration_provider = Some(provider);
        self
    }

    /// Freeze the definition. Fails if the alias or name is blank.
    pub fn build(self) -> Result<EditorDefinition> {
        if self.alias.trim().is_empty() {
            return Err(EditorError::MissingField { field: "alias" });
        }
        if self.name.trim().is_empty() {
            return Err(EditorError::MissingField { field: "name" });
        }
        Ok(self.finish())
    }

    /// Freeze a definition whose alias and name are known to be present.
    pub(crate) fn finish(self) -> EditorDefinition {
        debug_assert!(!self.alias.trim().is_empty() && !self.name.trim().is_empty());
        debug!(alias = %self.alias, "editor definition built");
        EditorDefinition {
            alias: self.alias,
            name: self.name,
            icon: self.icon,
            group: self.group,
            is_parameter_editor: self.is_parameter_editor,
            is_deprecated: self.is_deprecated,
            value_type: self.value_type,
            view: self.view,
            hide_label: self.hide_label,
            value_converter: self.value_converter,
            configuration_provider: self.configuration_provider,
        }
    }
}

/// Capability shared by every property editor.
///
/// Specializations wrap an [`EditorDefinition`] and override the factories
/// to substitute their own converter or provider types.
pub trait PropertyEditor: Send + Sync {
    fn definition(&self) -> &EditorDefinition;

    fn alias(&self) -> &str {
        self.definition().alias()
    }

    /// A converter for one field. Never cached.
    fn create_value_converter(&self) -> Instance<'_, dyn ValueConverter> {
        self.definition().base_value_converter()
    }

    /// A configuration provider. Never cached.
    fn create_configuration_provider(&self) -> Instance<'_, dyn ConfigurationProvider> {
        self.definition().base_configuration_provider()
    }

    /// A converter wired with a field's stored configuration.
    ///
    /// The provider turns `configuration` into the typed object the
    /// converter expects; wiring errors surface here, before any conversion.
    fn configured_value_converter(
        &self,
        configuration: &ConfigurationMap,
    ) -> Result<Instance<'_, dyn ValueConverter>> {
        let object = self
            .create_configuration_provider()
            .to_configuration_object(configuration)?;
        let mut converter = self.create_value_converter();
        converter.to_mut().set_configuration(Some(object))?;
        Ok(converter)
    }

    /// The view of this editor used by the parameter editor subsystem.
    ///
    /// Parameter editors have no configuration editor of their own; their
    /// configuration is the provider's default configuration.
    fn parameter_editor(&self) -> ParameterEditor<'_> {
        ParameterEditor {
            alias: self.alias(),
            value_converter: self.create_value_converter(),
            configuration: self.create_configuration_provider().default_configuration(),
        }
    }
}

impl PropertyEditor for EditorDefinition {
    fn definition(&self) -> &EditorDefinition {
        self
    }
}

/// Editors are equal when their aliases are, whatever their concrete type: a
/// specialization equals a plain definition registered under the same alias.
impl PartialEq for dyn PropertyEditor + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.alias() == other.alias()
    }
}

impl Eq for dyn PropertyEditor + '_ {}

impl Hash for dyn PropertyEditor + '_ {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alias().hash(state);
    }
}

impl fmt::Debug for dyn PropertyEditor + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.definition(), f)
    }
}

/// Read-only view of an editor as a parameter editor.
#[derive(Debug)]
pub struct ParameterEditor<'a> {
    pub alias: &'a str,
    pub value_converter: Instance<'a, dyn ValueConverter>,
    pub configuration: ConfigurationMap,
}
