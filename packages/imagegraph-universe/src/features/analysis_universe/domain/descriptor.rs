//! Registration descriptors
//!
//! Builder-style descriptions handed to `AnalysisUniverse::register_*`.

use super::element::{EntryPointData, MethodModifiers, TypeKind};
use crate::shared::models::TypeId;

#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) is_abstract: bool,
    pub(crate) superclass: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) enclosing: Option<TypeId>,
    pub(crate) annotations: Vec<String>,
}

impl TypeDescriptor {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_abstract: false,
            superclass: None,
            interfaces: Vec::new(),
            enclosing: None,
            annotations: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class).abstract_type()
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Primitive)
    }

    /// Builder: Set superclass
    pub fn extends(mut self, superclass: TypeId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Builder: Add a directly implemented (or extended) interface
    pub fn implements(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Builder: Mark abstract
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Builder: Set enclosing type
    pub fn nested_in(mut self, enclosing: TypeId) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    /// Builder: Add annotation
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub(crate) declaring: TypeId,
    pub(crate) name: String,
    pub(crate) parameter_types: Vec<TypeId>,
    pub(crate) return_type: Option<TypeId>,
    pub(crate) modifiers: MethodModifiers,
    pub(crate) entry_point: Option<EntryPointData>,
    pub(crate) annotations: Vec<String>,
}

impl MethodDescriptor {
    pub fn new(declaring: TypeId, name: impl Into<String>) -> Self {
        Self {
            declaring,
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: None,
            modifiers: MethodModifiers::default(),
            entry_point: None,
            annotations: Vec::new(),
        }
    }

    /// Constructor (`<init>`)
    pub fn constructor(declaring: TypeId) -> Self {
        let mut desc = Self::new(declaring, "<init>");
        desc.modifiers.is_constructor = true;
        desc
    }

    /// Builder: Set parameter types
    pub fn params<I: IntoIterator<Item = TypeId>>(mut self, params: I) -> Self {
        self.parameter_types = params.into_iter().collect();
        self
    }

    /// Builder: Set return type
    pub fn returns(mut self, ty: TypeId) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Builder: Mark static
    pub fn static_method(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Builder: Mark abstract (no body)
    pub fn abstract_method(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// Builder: Mark private
    pub fn private(mut self) -> Self {
        self.modifiers.is_private = true;
        self
    }

    /// Builder: Export as native entry point under `symbol`
    pub fn entry_point(mut self, symbol: impl Into<String>) -> Self {
        self.entry_point = Some(EntryPointData {
            symbol: symbol.into(),
        });
        self
    }

    /// Builder: Add annotation
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub(crate) declaring: TypeId,
    pub(crate) name: String,
    pub(crate) declared_type: TypeId,
    pub(crate) is_static: bool,
}

impl FieldDescriptor {
    pub fn new(declaring: TypeId, name: impl Into<String>, declared_type: TypeId) -> Self {
        Self {
            declaring,
            name: name.into(),
            declared_type,
            is_static: false,
        }
    }

    /// Builder: Mark static
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }
}
