use archmodel_core::ops::element_ops::{
    add_child_deployment_node, add_component, add_container, add_container_instance,
    add_deployment_node, add_person, add_software_system,
};
use archmodel_core::ops::relationship_ops::uses;
use archmodel_core::Model;

/// Create a new empty Model for testing
#[allow(dead_code)]
pub fn new_model() -> Model {
    Model::new()
}

/// Ids of a three-level static hierarchy: system, container, component
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub system: String,
    pub container: String,
    pub component: String,
}

/// Create `<prefix>` / `<prefix><prefix>` / `<prefix><prefix><prefix>`
///
/// `hierarchy(model, "A")` gives system `A`, container `AA` and component
/// `AAA`.
#[allow(dead_code)]
pub fn hierarchy(model: &mut Model, prefix: &str) -> Hierarchy {
    let system = add_software_system(model, prefix, "").unwrap();
    let container = add_container(model, &system, &prefix.repeat(2), "", "").unwrap();
    let component = add_component(model, &container, &prefix.repeat(3), "", "").unwrap();
    Hierarchy {
        system,
        container,
        component,
    }
}

/// Ids from [`container_scenario`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct ContainerScenario {
    pub user: String,
    pub system: String,
    pub used: String,
    pub idle: String,
}

/// Person U uses container C1 of S1; C2 in S1 has no relationships
#[allow(dead_code)]
pub fn container_scenario(model: &mut Model) -> ContainerScenario {
    let user = add_person(model, "U", "").unwrap();
    let system = add_software_system(model, "S1", "").unwrap();
    let used = add_container(model, &system, "C1", "", "").unwrap();
    let idle = add_container(model, &system, "C2", "", "").unwrap();
    uses(model, &user, &used, "Uses").unwrap();
    ContainerScenario {
        user,
        system,
        used,
        idle,
    }
}

/// Ids from [`live_deployment`]
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct LiveDeployment {
    pub system: String,
    pub web: String,
    pub database: String,
    pub aws: String,
    pub ec2: String,
    pub rds: String,
    pub web_instance: String,
    pub database_instance: String,
}

/// "Live" environment: AWS > EC2 running Web, AWS > RDS running Database
#[allow(dead_code)]
pub fn live_deployment(model: &mut Model) -> LiveDeployment {
    let system = add_software_system(model, "Internet Banking", "").unwrap();
    let web = add_container(model, &system, "Web", "", "Java").unwrap();
    let database = add_container(model, &system, "Database", "", "PostgreSQL").unwrap();
    uses(model, &web, &database, "Reads from").unwrap();

    let aws = add_deployment_node(model, "Live", "AWS", "", "", 1).unwrap();
    let ec2 = add_child_deployment_node(model, &aws, "EC2", "", "", 2).unwrap();
    let rds = add_child_deployment_node(model, &aws, "RDS", "", "", 1).unwrap();
    let web_instance = add_container_instance(model, &ec2, &web, None).unwrap();
    let database_instance = add_container_instance(model, &rds, &database, None).unwrap();

    LiveDeployment {
        system,
        web,
        database,
        aws,
        ec2,
        rds,
        web_instance,
        database_instance,
    }
}
