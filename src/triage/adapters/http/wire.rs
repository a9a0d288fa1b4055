//! Wire shapes of the tracking service and their mapping to domain types.

use crate::triage::{
    domain::{
        Activity, FreeTextFields, MergeStatus, NewTaskRequest, PlanningFields, PullRequest,
        PullRequestId, Relation, RelationKind, TagSet, UpdateField, UpdateRequest, UserIdentity,
        WorkItem, WorkItemId, WorkItemState, WorkItemType,
    },
    ports::{TrackerError, TrackerResult},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const FIELD_WORK_ITEM_TYPE: &str = "System.WorkItemType";
const FIELD_STATE: &str = "System.State";
const FIELD_TITLE: &str = "System.Title";
const FIELD_TAGS: &str = "System.Tags";
const FIELD_ASSIGNED_TO: &str = "System.AssignedTo";
const FIELD_ACCEPTANCE_CRITERIA: &str = "Microsoft.VSTS.Common.AcceptanceCriteria";
const FIELD_SYSTEM_INFO: &str = "Microsoft.VSTS.TCM.SystemInfo";
const FIELD_DESCRIPTION: &str = "System.Description";
const FIELD_ACTIVITY: &str = "Microsoft.VSTS.Common.Activity";
const FIELD_CREATED_BY: &str = "System.CreatedBy";
const FIELD_ITERATION_PATH: &str = "System.IterationPath";
const FIELD_AREA_PATH: &str = "System.AreaPath";
const FIELD_TEAM_PROJECT: &str = "System.TeamProject";
const FIELD_EFFORT: &str = "Microsoft.VSTS.Scheduling.Effort";
const FIELD_REMAINING_WORK: &str = "Microsoft.VSTS.Scheduling.RemainingWork";
const FIELD_ORIGINAL_ESTIMATE: &str = "Microsoft.VSTS.Scheduling.OriginalEstimate";
const FIELD_HISTORY: &str = "System.History";
const HIERARCHY_REVERSE: &str = "System.LinkTypes.Hierarchy-Reverse";

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestListDto {
    #[serde(default)]
    pub value: Vec<PullRequestDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PullRequestDto {
    pub pull_request_id: u64,
    pub created_by: IdentityDto,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub source_ref_name: String,
    #[serde(default)]
    pub target_ref_name: Option<String>,
    #[serde(default)]
    pub completion_options: Option<CompletionOptionsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdentityDto {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub unique_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompletionOptionsDto {
    #[serde(default)]
    pub merge_commit_message: Option<String>,
}

impl PullRequestDto {
    pub(crate) fn into_domain(self) -> TrackerResult<PullRequest> {
        let id = PullRequestId::new(self.pull_request_id.to_string())
            .map_err(|err| TrackerError::Decode(err.to_string()))?;
        let creator = UserIdentity::new(self.created_by.display_name, self.created_by.unique_name);
        let merge_status = MergeStatus::from_wire(self.merge_status.as_deref().unwrap_or_default());
        let mut pull_request = PullRequest::new(id, creator, merge_status, self.source_ref_name);
        if let Some(target) = self.target_ref_name {
            pull_request = pull_request.with_target_branch(target);
        }
        if let Some(message) = self
            .completion_options
            .and_then(|options| options.merge_commit_message)
        {
            pull_request = pull_request.with_merge_commit_message(message);
        }
        Ok(pull_request)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemDto {
    pub id: u32,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub relations: Option<Vec<RelationDto>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelationDto {
    pub rel: String,
    pub url: String,
}

impl WorkItemDto {
    pub(crate) fn into_domain(self) -> TrackerResult<WorkItem> {
        let id = WorkItemId::new(self.id).map_err(|err| TrackerError::Decode(err.to_string()))?;
        let fields = &self.fields;
        let mut item = WorkItem::new(
            id,
            WorkItemType::from_wire(text_field(fields, FIELD_WORK_ITEM_TYPE).unwrap_or_default()),
            WorkItemState::from_wire(text_field(fields, FIELD_STATE).unwrap_or_default()),
            text_field(fields, FIELD_TITLE).unwrap_or_default(),
        )
        .with_text(FreeTextFields {
            acceptance_criteria: text_field(fields, FIELD_ACCEPTANCE_CRITERIA).map(str::to_owned),
            system_info: text_field(fields, FIELD_SYSTEM_INFO).map(str::to_owned),
            description: text_field(fields, FIELD_DESCRIPTION).map(str::to_owned),
        })
        .with_planning(PlanningFields {
            iteration_path: text_field(fields, FIELD_ITERATION_PATH).map(str::to_owned),
            area_path: text_field(fields, FIELD_AREA_PATH).map(str::to_owned),
            team_project: text_field(fields, FIELD_TEAM_PROJECT).map(str::to_owned),
        });

        if !fields.contains_key(FIELD_TITLE) {
            item = item.without_title_field();
        }
        if let Some(tags) = text_field(fields, FIELD_TAGS) {
            item = item.with_tags(TagSet::parse(tags));
        }
        if let Some(assigned_to) = identity_field(fields, FIELD_ASSIGNED_TO) {
            item = item.with_assigned_to(assigned_to);
        }
        if let Some(created_by) = identity_field(fields, FIELD_CREATED_BY) {
            item = item.with_created_by(created_by);
        }
        if let Some(activity) = text_field(fields, FIELD_ACTIVITY) {
            item = item.with_activity(Activity::from_wire(activity));
        }
        if let Some(effort) = fields.get(FIELD_EFFORT).and_then(Value::as_f64) {
            item = item.with_effort(effort);
        }
        for relation in self.relations.unwrap_or_default() {
            item = item.with_relation(Relation::new(
                RelationKind::from_wire(&relation.rel),
                relation.url,
            ));
        }
        Ok(item)
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

/// Identity fields arrive either as `Name <DOMAIN\user>` strings or as
/// identity objects; both map to the string form.
fn identity_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(value) => Some(value.clone()),
        Value::Object(identity) => {
            let display = identity.get("displayName").and_then(Value::as_str)?;
            let annotated = identity
                .get("uniqueName")
                .and_then(Value::as_str)
                .map_or_else(|| display.to_owned(), |unique| format!("{display} <{unique}>"));
            Some(annotated)
        }
        _ => None,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WiqlResponseDto {
    #[serde(default)]
    pub work_items: Vec<WiqlReferenceDto>,
    #[serde(default)]
    pub work_item_relations: Vec<WiqlLinkDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WiqlReferenceDto {
    pub id: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WiqlLinkDto {
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub target: Option<WiqlReferenceDto>,
}

impl WiqlResponseDto {
    /// Flat results list the items directly; link queries list each source
    /// as a relation without a link type.
    pub(crate) fn into_ids(self) -> Vec<WorkItemId> {
        let link_sources = self
            .work_item_relations
            .into_iter()
            .filter(|link| link.rel.is_none())
            .filter_map(|link| link.target);
        let mut ids: Vec<WorkItemId> = Vec::new();
        for reference in self.work_items.into_iter().chain(link_sources) {
            if let Ok(id) = WorkItemId::new(reference.id)
                && !ids.contains(&id)
            {
                ids.push(id);
            }
        }
        ids
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WiqlQueryDto {
    pub query: String,
}

/// Query for backlog items and bugs assigned to `developer` that are
/// committed but have no children yet.
pub(crate) fn pending_parents_query(developer: &str) -> WiqlQueryDto {
    let escaped = developer.replace('\'', "''");
    WiqlQueryDto {
        query: format!(
            "SELECT [System.Id] FROM WorkItemLinks \
             WHERE ([Source].[System.WorkItemType] = 'Bug' \
             OR [Source].[System.WorkItemType] = 'Product Backlog Item') \
             AND ([System.Links.LinkType] = 'Child') \
             AND ([Source].[System.State] = 'Committed' \
             OR [Source].[System.State] = 'New' \
             OR [Source].[System.State] = 'Approved') \
             AND ([Source].[System.AssignedTo] = '{escaped}') \
             ORDER BY [System.ChangedDate] DESC \
             MODE (DoesNotContain)"
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PatchOperationDto {
    pub op: &'static str,
    pub path: String,
    pub value: Value,
}

impl PatchOperationDto {
    fn add_field(field: &str, value: Value) -> Self {
        Self {
            op: "add",
            path: format!("/fields/{field}"),
            value,
        }
    }
}

const fn field_name(field: UpdateField) -> &'static str {
    match field {
        UpdateField::State => FIELD_STATE,
        UpdateField::Title => FIELD_TITLE,
        UpdateField::Tags => FIELD_TAGS,
        UpdateField::AssignedTo => FIELD_ASSIGNED_TO,
        UpdateField::Comment => FIELD_HISTORY,
    }
}

pub(crate) fn update_patch(request: &UpdateRequest) -> Vec<PatchOperationDto> {
    request
        .operations()
        .into_iter()
        .map(|patch| PatchOperationDto {
            op: patch.op.as_str(),
            path: format!("/fields/{}", field_name(patch.field)),
            value: Value::String(patch.value),
        })
        .collect()
}

pub(crate) fn new_task_patch(request: &NewTaskRequest, parent_url: &str) -> Vec<PatchOperationDto> {
    let mut operations = vec![PatchOperationDto::add_field(
        FIELD_TITLE,
        Value::String(request.title.clone()),
    )];
    if let Some(hours) = request.remaining_work {
        operations.push(PatchOperationDto::add_field(FIELD_REMAINING_WORK, json!(hours)));
        operations.push(PatchOperationDto::add_field(
            FIELD_ORIGINAL_ESTIMATE,
            json!(hours),
        ));
    }
    operations.push(PatchOperationDto::add_field(
        FIELD_ACTIVITY,
        Value::String(request.activity.as_str().to_owned()),
    ));
    if let Some(assigned_to) = &request.assigned_to {
        operations.push(PatchOperationDto::add_field(
            FIELD_ASSIGNED_TO,
            Value::String(assigned_to.clone()),
        ));
    }
    let planning = [
        (FIELD_ITERATION_PATH, &request.planning.iteration_path),
        (FIELD_AREA_PATH, &request.planning.area_path),
        (FIELD_TEAM_PROJECT, &request.planning.team_project),
    ];
    for (field, value) in planning {
        if let Some(value) = value {
            operations.push(PatchOperationDto::add_field(
                field,
                Value::String(value.clone()),
            ));
        }
    }
    operations.push(PatchOperationDto {
        op: "add",
        path: "/relations/-".to_owned(),
        value: json!({
            "rel": HIERARCHY_REVERSE,
            "url": parent_url,
            "attributes": { "comment": format!("Added {} task", request.activity.as_str()) },
        }),
    });
    operations
}
