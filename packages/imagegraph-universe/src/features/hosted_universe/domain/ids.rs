//! Dense identities of the compilation universe
//!
//! Unlike analysis ids, hosted ids encode layout: type ids are assigned in
//! hierarchy order so subtype checks reduce to interval membership.

use crate::shared::models::element_id;

element_id!(
    /// Identity of a hosted type; its raw value is the type-check id
    HostedTypeId,
    "hosted-type"
);
element_id!(
    /// Identity of a hosted method
    HostedMethodId,
    "hosted-method"
);
element_id!(
    /// Identity of a hosted field
    HostedFieldId,
    "hosted-field"
);
