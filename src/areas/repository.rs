use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{REPOSITORY_DIR, Workspace};
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::RepositoryConfig;
use crate::errors::TwigError;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything one command runs against: the working tree, the `.twig`
/// areas inside it, the output channel and the runtime configuration
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: RepositoryConfig,
}

impl Repository {
    pub fn new(
        path: &str,
        writer: Box<dyn std::io::Write>,
        config: RepositoryConfig,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let twig_path = path.join(REPOSITORY_DIR);

        let index = Index::new(twig_path.join("index").into_boxed_path());
        let database = Database::new(twig_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(twig_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn twig_path(&self) -> Box<Path> {
        self.path.join(REPOSITORY_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn graph(&'_ self) -> CommitGraph<'_> {
        CommitGraph::new(&self.database, self.config)
    }

    pub fn is_initialized(&self) -> bool {
        self.twig_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(TwigError::NotInitialized.into());
        }

        Ok(())
    }

    /// Id and record of the commit the current branch points to
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = self.refs.read_head()?;
        let commit = self.database.load_commit(&oid)?;

        Ok((oid, commit))
    }

    /// Commit named by an abbreviated id
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<(ObjectId, Commit)> {
        let oid = self.database.resolve_abbreviated(prefix)?;
        let commit = self.database.load_commit(&oid)?;

        Ok((oid, commit))
    }
}
