//! Context command - print the query without sending it

use anyhow::Result;

use crate::config::Config;

pub async fn run(config: &Config, path: Option<&str>, file: Option<&str>, question: &str) -> Result<()> {
    let mut session = super::build_session(config)?;
    session.analyze(&super::project_root(path)).await?;

    let current_file = file
        .map(|f| super::load_current_file(&session, f))
        .transpose()?;

    print!("{}", session.prepare_query(question, current_file.as_ref())?);
    Ok(())
}
