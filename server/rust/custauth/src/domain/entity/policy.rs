use serde::Serialize;

use super::claims::SessionClaims;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

/// AuthorizerPolicy は API ゲートウェイの authorizer に返すポリシー。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerPolicy {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
    pub context: PolicyContext,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

/// ゲートウェイが後続の統合に渡すコンテキスト。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyContext {
    pub user_id: String,
    pub cpf: String,
    pub name: String,
    pub email: String,
}

impl AuthorizerPolicy {
    pub fn new(
        principal_id: impl Into<String>,
        effect: Effect,
        resource: impl Into<String>,
        context: PolicyContext,
    ) -> Self {
        Self {
            principal_id: principal_id.into(),
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: resource.into(),
                }],
            },
            context,
        }
    }

    /// 検証済み claims から、要求されたリソースに限定した Allow ポリシーを作る。
    pub fn allow(claims: &SessionClaims, resource: impl Into<String>) -> Self {
        let user_id = claims.principal_id();
        Self::new(
            user_id.clone(),
            Effect::Allow,
            resource,
            PolicyContext {
                user_id,
                cpf: claims.cpf.clone(),
                name: claims.name.clone(),
                email: claims.email.clone().unwrap_or_default(),
            },
        )
    }
}
