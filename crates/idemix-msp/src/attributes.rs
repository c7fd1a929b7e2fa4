//! Credential attribute layout: attribute 0 commits to the encoded OU
//! record, attribute 1 to the encoded Role record. Both are always
//! disclosed.

use idemix_core::{OrganizationalUnit, Role};
use idemix_crypto::{hash_mod_order, Fr};

/// Name of attribute 0 in the issuer key.
pub const ATTRIBUTE_NAME_OU: &str = "OU";

/// Name of attribute 1 in the issuer key.
pub const ATTRIBUTE_NAME_ROLE: &str = "Role";

/// Disclosure flags used for every signature: OU and Role disclosed.
pub(crate) const DISCLOSURE: [u8; 2] = [1, 1];

/// Attribute value committing to `ou`.
pub fn ou_attribute(ou: &OrganizationalUnit) -> Fr {
    hash_mod_order(&ou.encode())
}

/// Attribute value committing to `role`.
pub fn role_attribute(role: &Role) -> Fr {
    hash_mod_order(&role.encode())
}
