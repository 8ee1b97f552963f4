/// Delete every variable scoped to one environment
pub mod remove_env_variables;
/// Delete every pipeline of a project
pub mod remove_pipelines;
/// Upload variables from a JSON document
pub mod set_variables;
