use surrealdb::{RecordId, Surreal, engine::any::Any};

use crate::{
    consts::table::MEMBERSHIP_TABLE,
    errors::{Error, Result},
    models::{
        template::TemplateKind,
        workspace::{Membership, Workspace},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Workspace,
    Membership,
    Template,
    Vocabulary,
    Journal,
    Invite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

/// Membership and ownership facts for one (actor, workspace) pair, loaded
/// fresh from the store for every request. Decisions are never cached across
/// a mutation: the next check sees the next truth.
#[derive(Debug, Clone)]
pub struct AccessScope {
    pub actor: RecordId,
    pub workspace_id: RecordId,
    pub owner_id: RecordId,
    pub is_member: bool,
}

impl AccessScope {
    pub async fn load(
        sdb: &Surreal<Any>,
        actor: &RecordId,
        workspace_id: &RecordId,
    ) -> Result<Self> {
        let workspace: Workspace = sdb
            .select(workspace_id.clone())
            .await?
            .ok_or(Error::NotFound)?;

        let membership = sdb
            .query(
                "SELECT * FROM type::table($table) WHERE workspace_id = $workspace_id AND account_id = $account_id;",
            )
            .bind(("table", MEMBERSHIP_TABLE))
            .bind(("workspace_id", workspace_id.clone()))
            .bind(("account_id", actor.clone()))
            .await?
            .take::<Vec<Membership>>(0)?;

        Ok(Self {
            actor: actor.clone(),
            workspace_id: workspace_id.clone(),
            owner_id: workspace.owner_id,
            is_member: !membership.is_empty(),
        })
    }

    /// Core membership is owner-equality, always recomputed.
    pub fn is_core(&self) -> bool {
        self.actor == self.owner_id
    }
}

/// Row-level facts some rules need. Absent fields simply make the clauses
/// that read them evaluate to false.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFacts<'a> {
    pub created_by: Option<&'a RecordId>,
    pub member_account: Option<&'a RecordId>,
    pub template_kind: Option<TemplateKind>,
}

/// The evaluator. Pure, side-effect-free, OR of applicable clauses over the
/// scope and row facts; every read/write path goes through here, nothing
/// self-polices.
pub fn can_access(scope: &AccessScope, kind: EntityKind, op: Operation, row: &RowFacts) -> bool {
    use EntityKind::*;
    use Operation::*;

    // Std templates are the one surface visible outside a workspace.
    if kind == Template && row.template_kind == Some(TemplateKind::Std) {
        return op == Read;
    }

    if !scope.is_member {
        return false;
    }

    let core = scope.is_core();
    let created_by_actor = row.created_by == Some(&scope.actor);

    match (kind, op) {
        (Workspace, Read) => true,
        (Workspace, Update) => core, // rename path
        (Workspace, Create) | (Workspace, Delete) => false, // system-only (bootstrap)

        (Membership, Read) => core || row.member_account == Some(&scope.actor),
        (Membership, Create) | (Membership, Update) => core,
        // The owner's row is permanently protected, even from the owner,
        // for whom "self" and "core" coincide.
        (Membership, Delete) => core && row.member_account != Some(&scope.owner_id),

        (Template, Read) => true,
        (Template, Create) => true,
        (Template, Update) => core || created_by_actor,
        (Template, Delete) => core,

        (Vocabulary, Read) | (Vocabulary, Create) => true,
        (Vocabulary, Update) | (Vocabulary, Delete) => core,

        (Journal, Read) => true,
        (Journal, Create) => created_by_actor,
        (Journal, Update) => core || created_by_actor,
        (Journal, Delete) => core,

        (Invite, _) => core,
    }
}

pub fn check(scope: &AccessScope, kind: EntityKind, op: Operation, row: &RowFacts) -> Result<()> {
    if can_access(scope, kind, op, row) {
        Ok(())
    } else {
        Err(Error::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    fn scope(actor: &str, owner: &str, is_member: bool) -> AccessScope {
        AccessScope {
            actor: rid("accounts", actor),
            workspace_id: rid("workspaces", owner),
            owner_id: rid("accounts", owner),
            is_member,
        }
    }

    #[test]
    fn core_is_owner_equality() {
        assert!(scope("a", "a", true).is_core());
        assert!(!scope("b", "a", true).is_core());
    }

    #[test]
    fn non_members_see_nothing_but_std_templates() {
        let outsider = scope("x", "a", false);
        for kind in [
            EntityKind::Workspace,
            EntityKind::Membership,
            EntityKind::Journal,
            EntityKind::Invite,
            EntityKind::Vocabulary,
        ] {
            for op in [
                Operation::Read,
                Operation::Create,
                Operation::Update,
                Operation::Delete,
            ] {
                assert!(!can_access(&outsider, kind, op, &RowFacts::default()));
            }
        }

        let std_row = RowFacts {
            template_kind: Some(TemplateKind::Std),
            ..Default::default()
        };
        assert!(can_access(
            &outsider,
            EntityKind::Template,
            Operation::Read,
            &std_row
        ));
        assert!(!can_access(
            &outsider,
            EntityKind::Template,
            Operation::Update,
            &std_row
        ));
    }

    #[test]
    fn std_templates_are_immutable_even_for_core() {
        let core = scope("a", "a", true);
        let std_row = RowFacts {
            template_kind: Some(TemplateKind::Std),
            ..Default::default()
        };
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert!(!can_access(&core, EntityKind::Template, op, &std_row));
        }
    }

    #[test]
    fn owner_cannot_delete_own_membership_row() {
        // The owner's row is simultaneously "self" and "core"; the protected
        // row rule still wins.
        let owner = scope("a", "a", true);
        let owner_account = rid("accounts", "a");
        let row = RowFacts {
            member_account: Some(&owner_account),
            ..Default::default()
        };
        assert!(!can_access(&owner, EntityKind::Membership, Operation::Delete, &row));

        // Any other row is fair game for core.
        let other = rid("accounts", "b");
        let row = RowFacts {
            member_account: Some(&other),
            ..Default::default()
        };
        assert!(can_access(&owner, EntityKind::Membership, Operation::Delete, &row));
    }

    #[test]
    fn membership_read_is_self_or_core() {
        let member = scope("b", "a", true);
        let own = rid("accounts", "b");
        let other = rid("accounts", "c");
        let own_row = RowFacts {
            member_account: Some(&own),
            ..Default::default()
        };
        let other_row = RowFacts {
            member_account: Some(&other),
            ..Default::default()
        };
        assert!(can_access(&member, EntityKind::Membership, Operation::Read, &own_row));
        assert!(!can_access(&member, EntityKind::Membership, Operation::Read, &other_row));

        let core = scope("a", "a", true);
        assert!(can_access(&core, EntityKind::Membership, Operation::Read, &other_row));
    }

    #[test]
    fn custom_template_update_is_core_or_creator() {
        let creator_id = rid("accounts", "b");
        let row = RowFacts {
            created_by: Some(&creator_id),
            template_kind: Some(TemplateKind::Custom),
            ..Default::default()
        };

        let creator = scope("b", "a", true);
        let bystander = scope("c", "a", true);
        let core = scope("a", "a", true);

        assert!(can_access(&creator, EntityKind::Template, Operation::Update, &row));
        assert!(!can_access(&bystander, EntityKind::Template, Operation::Update, &row));
        assert!(can_access(&core, EntityKind::Template, Operation::Update, &row));

        // Delete stays core-only regardless of creator.
        assert!(!can_access(&creator, EntityKind::Template, Operation::Delete, &row));
        assert!(can_access(&core, EntityKind::Template, Operation::Delete, &row));
    }

    #[test]
    fn journal_rules() {
        let author_id = rid("accounts", "b");
        let row = RowFacts {
            created_by: Some(&author_id),
            ..Default::default()
        };

        let author = scope("b", "a", true);
        let other_member = scope("c", "a", true);
        let core = scope("a", "a", true);

        // Create requires authoring your own journal.
        assert!(can_access(&author, EntityKind::Journal, Operation::Create, &row));
        assert!(!can_access(&other_member, EntityKind::Journal, Operation::Create, &row));

        assert!(can_access(&other_member, EntityKind::Journal, Operation::Read, &row));
        assert!(can_access(&author, EntityKind::Journal, Operation::Update, &row));
        assert!(!can_access(&other_member, EntityKind::Journal, Operation::Update, &row));
        assert!(can_access(&core, EntityKind::Journal, Operation::Update, &row));

        assert!(!can_access(&author, EntityKind::Journal, Operation::Delete, &row));
        assert!(can_access(&core, EntityKind::Journal, Operation::Delete, &row));
    }

    #[test]
    fn invites_are_core_only() {
        let member = scope("b", "a", true);
        let core = scope("a", "a", true);
        for op in [
            Operation::Read,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
        ] {
            assert!(!can_access(&member, EntityKind::Invite, op, &RowFacts::default()));
            assert!(can_access(&core, EntityKind::Invite, op, &RowFacts::default()));
        }
    }
}
