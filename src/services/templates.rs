use surrealdb::{RecordId, Surreal, engine::any::Any};
use tracing::info;

use crate::{
    authz::{self, AccessScope, EntityKind, Operation, RowFacts},
    consts::table::TEMPLATE_TABLE,
    errors::{Error, Result},
    models::template::{CreateTemplate, Template, TemplateKind},
    utils::time::time_now,
};

/// Built-in summarization templates, seeded once at startup. These are the
/// system-only `Std` rows: readable by anyone, mutable by nobody.
const STD_TEMPLATES: &[(&str, &str)] = &[
    (
        "Daily summary",
        "Summarize this voice journal entry in a few sentences, keeping the speaker's tone.",
    ),
    (
        "Bullet points",
        "Condense this voice journal entry into short bullet points of the key thoughts.",
    ),
    (
        "Gratitude",
        "Pull out what the speaker is grateful for and summarize the rest briefly.",
    ),
];

pub async fn seed_std_templates(sdb: &Surreal<Any>) -> Result<()> {
    for (name, prompt) in STD_TEMPLATES {
        let existing: Vec<Template> = sdb
            .query("SELECT * FROM type::table($table) WHERE kind = $kind AND name = $name;")
            .bind(("table", TEMPLATE_TABLE))
            .bind(("kind", TemplateKind::Std))
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        if existing.is_empty() {
            let _: Option<Template> = sdb
                .create(TEMPLATE_TABLE)
                .content(CreateTemplate {
                    workspace_id: None,
                    kind: TemplateKind::Std,
                    name: name.to_string(),
                    prompt: prompt.to_string(),
                    created_by: None,
                    created_at: time_now(),
                })
                .await?;
            info!("seeded std template `{name}`");
        }
    }
    Ok(())
}

/// Std templates for everyone, the workspace's custom ones for its members.
pub async fn list_templates(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
) -> Result<Vec<Template>> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }

    let templates: Vec<Template> = sdb
        .query(
            "SELECT * FROM type::table($table) WHERE kind = $std OR workspace_id = $workspace_id;",
        )
        .bind(("table", TEMPLATE_TABLE))
        .bind(("std", TemplateKind::Std))
        .bind(("workspace_id", workspace_id.clone()))
        .await?
        .take(0)?;
    Ok(templates)
}

pub async fn list_std_templates(sdb: &Surreal<Any>) -> Result<Vec<Template>> {
    let templates: Vec<Template> = sdb
        .query("SELECT * FROM type::table($table) WHERE kind = $std;")
        .bind(("table", TEMPLATE_TABLE))
        .bind(("std", TemplateKind::Std))
        .await?
        .take(0)?;
    Ok(templates)
}

pub async fn create_template(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    workspace_id: &RecordId,
    name: String,
    prompt: String,
) -> Result<Template> {
    let scope = AccessScope::load(sdb, actor, workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        template_kind: Some(TemplateKind::Custom),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Template, Operation::Create, &row)?;

    sdb.create(TEMPLATE_TABLE)
        .content(CreateTemplate {
            workspace_id: Some(workspace_id.clone()),
            kind: TemplateKind::Custom,
            name,
            prompt,
            created_by: Some(actor.clone()),
            created_at: time_now(),
        })
        .await?
        .ok_or(Error::InternalServerError)
}

/// Core member or the original creator. Std templates refuse every caller.
pub async fn update_template(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    template_id: &RecordId,
    name: Option<String>,
    prompt: Option<String>,
) -> Result<Template> {
    let template: Template = sdb
        .select(template_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let workspace_id = template.workspace_id.clone().ok_or(Error::PermissionDenied)?;
    let scope = AccessScope::load(sdb, actor, &workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        created_by: template.created_by.as_ref(),
        template_kind: Some(template.kind),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Template, Operation::Update, &row)?;

    let updated: Vec<Template> = sdb
        .query(
            "UPDATE $template SET name = $name ?? name, prompt = $prompt ?? prompt, updated_at = $now RETURN AFTER;",
        )
        .bind(("template", template_id.clone()))
        .bind(("name", name))
        .bind(("prompt", prompt))
        .bind(("now", time_now()))
        .await?
        .take(0)?;
    updated.into_iter().next().ok_or(Error::NotFound)
}

pub async fn delete_template(
    sdb: &Surreal<Any>,
    actor: &RecordId,
    template_id: &RecordId,
) -> Result<()> {
    let template: Template = sdb
        .select(template_id.clone())
        .await?
        .ok_or(Error::NotFound)?;

    let workspace_id = template.workspace_id.clone().ok_or(Error::PermissionDenied)?;
    let scope = AccessScope::load(sdb, actor, &workspace_id).await?;
    if !scope.is_member {
        return Err(Error::NotFound);
    }
    let row = RowFacts {
        created_by: template.created_by.as_ref(),
        template_kind: Some(template.kind),
        ..Default::default()
    };
    authz::check(&scope, EntityKind::Template, Operation::Delete, &row)?;

    let _: Option<Template> = sdb.delete(template_id.clone()).await?;
    Ok(())
}
