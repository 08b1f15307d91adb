//! Request body for `POST /v3/auth/tokens`.
//!
//! These types only serialize and borrow from the caller; none of them
//! implement `Debug` because they carry the password.

use serde::Serialize;

use crate::domain::models::{IdentityEndpoint, PasswordCredentials};

/// Authentication method named in `identity.methods`.
pub const PASSWORD_METHOD: &str = "password";

/// Keystone v3 password-auth request body
#[derive(Serialize)]
pub struct AuthRequest<'a> {
    auth: Auth<'a>,
}

#[derive(Serialize)]
struct Auth<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Serialize)]
struct Identity<'a> {
    methods: [&'static str; 1],
    password: PasswordMethod<'a>,
}

#[derive(Serialize)]
struct PasswordMethod<'a> {
    user: PasswordUser<'a>,
}

#[derive(Serialize)]
struct PasswordUser<'a> {
    name: &'a str,
    domain: NamedRef<'a>,
    password: &'a str,
}

#[derive(Serialize)]
struct NamedRef<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct Scope<'a> {
    project: IdRef<'a>,
}

#[derive(Serialize)]
struct IdRef<'a> {
    id: &'a str,
}

impl<'a> AuthRequest<'a> {
    /// Password identity scoped to the endpoint's project
    pub fn password(endpoint: &'a IdentityEndpoint, credentials: &'a PasswordCredentials) -> Self {
        Self {
            auth: Auth {
                identity: Identity {
                    methods: [PASSWORD_METHOD],
                    password: PasswordMethod {
                        user: PasswordUser {
                            name: &credentials.username,
                            domain: NamedRef {
                                name: &credentials.user_domain_name,
                            },
                            password: &credentials.password,
                        },
                    },
                },
                scope: Scope {
                    project: IdRef {
                        id: &endpoint.project_id,
                    },
                },
            },
        }
    }
}
