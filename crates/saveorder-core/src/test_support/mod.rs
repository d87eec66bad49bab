//! Test-only fixture models and an `Rc`-backed metadata provider.

use crate::{
    model::{entity::EntityModel, registry::EntityModelRegistry, relation::RelationModel},
    traits::MetadataProvider,
};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

pub(crate) const PARENT_PATH: &str = "test_support::Parent";
pub(crate) const CHILD_PATH: &str = "test_support::Child";
pub(crate) const ROOT_PATH: &str = "test_support::Root";
pub(crate) const FIRST_PATH: &str = "test_support::First";
pub(crate) const SECOND_PATH: &str = "test_support::Second";
pub(crate) const EMPLOYEE_PATH: &str = "test_support::Employee";
pub(crate) const LEFT_PATH: &str = "test_support::Left";
pub(crate) const RIGHT_PATH: &str = "test_support::Right";
pub(crate) const NODE_PATH: &str = "test_support::Node";
pub(crate) const OTHER_PATH: &str = "test_support::Other";
pub(crate) const UNMAPPED_PATH: &str = "test_support::Unmapped";

// Parent 1..n Child
static PARENT_CHILDREN: RelationModel = RelationModel::collection("children", Some(&CHILD_PARENT));
static CHILD_PARENT: RelationModel = RelationModel::reference("parent", Some(&PARENT_CHILDREN));

// Root embeds First embeds Second
static ROOT_FIRST: RelationModel = RelationModel::embedded("first");
static FIRST_SECOND: RelationModel = RelationModel::embedded("second");

// Employee -> Employee
static EMPLOYEE_MANAGER: RelationModel = RelationModel::reference("manager", None);

// Left <-> Right, both sides hold a key
static LEFT_RIGHT: RelationModel = RelationModel::reference("right", None);
static RIGHT_LEFT: RelationModel = RelationModel::reference("left", None);

// Node and Other share one relation shape
static NODE_PARENT: RelationModel = RelationModel::reference("parent", Some(&NODE_CHILDREN));
static NODE_CHILDREN: RelationModel = RelationModel::collection("children", Some(&NODE_PARENT));
static NODE_EMBEDDED: RelationModel = RelationModel::embedded("embedded");
static NODE_PEER: RelationModel = RelationModel::reference("peer", None);

static PARENT_RELATIONS: [&RelationModel; 1] = [&PARENT_CHILDREN];
static CHILD_RELATIONS: [&RelationModel; 1] = [&CHILD_PARENT];
static ROOT_RELATIONS: [&RelationModel; 1] = [&ROOT_FIRST];
static FIRST_RELATIONS: [&RelationModel; 1] = [&FIRST_SECOND];
static EMPLOYEE_RELATIONS: [&RelationModel; 1] = [&EMPLOYEE_MANAGER];
static LEFT_RELATIONS: [&RelationModel; 1] = [&LEFT_RIGHT];
static RIGHT_RELATIONS: [&RelationModel; 1] = [&RIGHT_LEFT];
static NODE_RELATIONS: [&RelationModel; 4] =
    [&NODE_PARENT, &NODE_CHILDREN, &NODE_EMBEDDED, &NODE_PEER];

pub(crate) static PARENT_MODEL: EntityModel =
    EntityModel::new(PARENT_PATH, "Parent", &PARENT_RELATIONS);
pub(crate) static CHILD_MODEL: EntityModel =
    EntityModel::new(CHILD_PATH, "Child", &CHILD_RELATIONS);
pub(crate) static ROOT_MODEL: EntityModel = EntityModel::new(ROOT_PATH, "Root", &ROOT_RELATIONS);
pub(crate) static FIRST_MODEL: EntityModel =
    EntityModel::new(FIRST_PATH, "First", &FIRST_RELATIONS);
pub(crate) static SECOND_MODEL: EntityModel = EntityModel::new(SECOND_PATH, "Second", &[]);
pub(crate) static EMPLOYEE_MODEL: EntityModel =
    EntityModel::new(EMPLOYEE_PATH, "Employee", &EMPLOYEE_RELATIONS);
pub(crate) static LEFT_MODEL: EntityModel = EntityModel::new(LEFT_PATH, "Left", &LEFT_RELATIONS);
pub(crate) static RIGHT_MODEL: EntityModel =
    EntityModel::new(RIGHT_PATH, "Right", &RIGHT_RELATIONS);
// Node and Other share one relation list
pub(crate) static NODE_MODEL: EntityModel = EntityModel::new(NODE_PATH, "Node", &NODE_RELATIONS);
pub(crate) static OTHER_MODEL: EntityModel =
    EntityModel::new(OTHER_PATH, "Other", &NODE_RELATIONS);

///
/// FixtureEntity
///
/// Dynamically-typed test entity; navigations are stored by relation name.
///

pub(crate) struct FixtureEntity {
    pub(crate) path: &'static str,
    pub(crate) label: String,
    links: RefCell<BTreeMap<&'static str, Vec<Fixture>>>,
}

pub(crate) type Fixture = Rc<FixtureEntity>;

impl std::fmt::Debug for FixtureEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.path, self.label)
    }
}

/// Create a fixture entity of the given model path.
pub(crate) fn entity(path: &'static str, label: impl Into<String>) -> Fixture {
    Rc::new(FixtureEntity {
        path,
        label: label.into(),
        links: RefCell::new(BTreeMap::new()),
    })
}

/// Set a reference navigation, replacing any previous target.
pub(crate) fn set_ref(owner: &Fixture, relation: &'static str, target: &Fixture) {
    owner
        .links
        .borrow_mut()
        .insert(relation, vec![Rc::clone(target)]);
}

/// Append one member to a collection navigation.
pub(crate) fn push_member(owner: &Fixture, relation: &'static str, member: &Fixture) {
    owner
        .links
        .borrow_mut()
        .entry(relation)
        .or_default()
        .push(Rc::clone(member));
}

/// Labels of a resolved sequence, for readable assertions.
pub(crate) fn labels<'a>(entities: impl IntoIterator<Item = &'a Fixture>) -> Vec<String> {
    entities
        .into_iter()
        .map(|entity| entity.label.clone())
        .collect()
}

///
/// FixtureMetadata
///

pub(crate) struct FixtureMetadata {
    registry: EntityModelRegistry,
}

impl FixtureMetadata {
    pub(crate) fn new() -> Self {
        let registry = EntityModelRegistry::from_models([
            &PARENT_MODEL,
            &CHILD_MODEL,
            &ROOT_MODEL,
            &FIRST_MODEL,
            &SECOND_MODEL,
            &EMPLOYEE_MODEL,
            &LEFT_MODEL,
            &RIGHT_MODEL,
            &NODE_MODEL,
            &OTHER_MODEL,
        ])
        .expect("fixture models register cleanly");

        Self { registry }
    }
}

impl MetadataProvider for FixtureMetadata {
    type Entity = Fixture;

    fn resolve_type(&self, entity: &Fixture) -> Option<&'static EntityModel> {
        self.registry.try_get(entity.path)
    }

    fn collection_value(
        &self,
        entity: &Fixture,
        relation: &'static RelationModel,
    ) -> Option<Vec<Fixture>> {
        entity.links.borrow().get(relation.name).cloned()
    }

    fn reference_value(
        &self,
        entity: &Fixture,
        relation: &'static RelationModel,
    ) -> Option<Fixture> {
        entity
            .links
            .borrow()
            .get(relation.name)
            .and_then(|targets| targets.first().cloned())
    }
}
