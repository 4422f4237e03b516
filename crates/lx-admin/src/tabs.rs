//! One visible back-office panel at a time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::controller::ResourceController;
use crate::dashboard::Dashboard;
use crate::resource::Resource;
use crate::view::Spawner;

pub const TAB_TITLES: [(&str, &str); 8] = [
    ("dashboard", "Dashboard"),
    ("products", "Products"),
    ("testimonials", "Testimonials"),
    ("videos", "Videos"),
    ("giveaway", "Giveaway"),
    ("messages", "Messages"),
    ("subscribers", "Subscribers"),
    ("sections", "Section Visibility"),
];

fn lookup(tab_id: &str) -> Option<(&'static str, &'static str)> {
    TAB_TITLES.iter().copied().find(|(id, _)| *id == tab_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("unknown tab `{0}`")]
    UnknownTab(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Activated { loaded: bool },
    AlreadyActive,
}

/// Something a tab refreshes when shown.
#[async_trait(?Send)]
pub trait Loadable {
    async fn reload(&self);
}

#[async_trait(?Send)]
impl<R: Resource> Loadable for ResourceController<R> {
    async fn reload(&self) {
        self.load().await;
    }
}

#[async_trait(?Send)]
impl Loadable for Dashboard {
    async fn reload(&self) {
        self.load().await;
    }
}

/// Panel `<id>-tab` and menu entry `[data-tab=<id>]`, plus the heading.
pub trait TabView {
    fn set_active(&self, tab_id: &str, active: bool);
    fn set_title(&self, title: &str);
}

pub struct TabRouter {
    view: Rc<dyn TabView>,
    loaders: RefCell<Vec<(&'static str, Rc<dyn Loadable>)>>,
    active: Cell<Option<&'static str>>,
}

impl TabRouter {
    /// `initial` is the panel the page was served with; it is not re-rendered.
    pub fn new(view: Rc<dyn TabView>, initial: &str) -> Result<Self, RouterError> {
        let (initial, _) = lookup(initial).ok_or_else(|| RouterError::UnknownTab(initial.to_owned()))?;
        Ok(Self {
            view,
            loaders: RefCell::new(Vec::new()),
            active: Cell::new(Some(initial)),
        })
    }

    pub fn register(&self, tab_id: &str, loader: Rc<dyn Loadable>) -> Result<(), RouterError> {
        let (tab_id, _) = lookup(tab_id).ok_or_else(|| RouterError::UnknownTab(tab_id.to_owned()))?;
        let mut loaders = self.loaders.borrow_mut();
        loaders.retain(|(id, _)| *id != tab_id);
        loaders.push((tab_id, loader));
        Ok(())
    }

    pub fn active(&self) -> Option<&'static str> {
        self.active.get()
    }

    pub async fn activate(&self, tab_id: &str) -> Result<Activation, RouterError> {
        let (tab_id, title) = lookup(tab_id).ok_or_else(|| RouterError::UnknownTab(tab_id.to_owned()))?;
        if self.active.get() == Some(tab_id) {
            return Ok(Activation::AlreadyActive);
        }

        for (id, _) in TAB_TITLES {
            self.view.set_active(id, id == tab_id);
        }
        self.view.set_title(title);
        self.active.set(Some(tab_id));
        debug!(tab = tab_id, "activated tab");

        let loader = self
            .loaders
            .borrow()
            .iter()
            .find(|(id, _)| *id == tab_id)
            .map(|(_, loader)| loader.clone());
        match loader {
            Some(loader) => {
                loader.reload().await;
                Ok(Activation::Activated { loaded: true })
            }
            None => Ok(Activation::Activated { loaded: false }),
        }
    }

    /// Start every registered loader at once; returns how many were started.
    pub fn reload_all(&self, spawner: &dyn Spawner) -> usize {
        let loaders: Vec<Rc<dyn Loadable>> =
            self.loaders.borrow().iter().map(|(_, loader)| loader.clone()).collect();
        for loader in &loaders {
            let loader = loader.clone();
            spawner.spawn(Box::pin(async move { loader.reload().await }));
        }
        loaders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::QueueSpawner;

    #[derive(Default)]
    struct Panels {
        active: RefCell<Vec<String>>,
        title: RefCell<String>,
    }

    impl TabView for Panels {
        fn set_active(&self, tab_id: &str, active: bool) {
            let mut list = self.active.borrow_mut();
            list.retain(|id| id != tab_id);
            if active {
                list.push(tab_id.to_owned());
            }
        }

        fn set_title(&self, title: &str) {
            *self.title.borrow_mut() = title.to_owned();
        }
    }

    #[derive(Default)]
    struct CountingLoader(Cell<usize>);

    #[async_trait(?Send)]
    impl Loadable for CountingLoader {
        async fn reload(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn router() -> (TabRouter, Rc<Panels>, Rc<CountingLoader>) {
        let panels = Rc::new(Panels::default());
        let router = TabRouter::new(panels.clone(), "dashboard").expect("dashboard is a tab");
        let loader = Rc::new(CountingLoader::default());
        router.register("products", loader.clone()).expect("products is a tab");
        (router, panels, loader)
    }

    #[tokio::test]
    async fn exactly_one_panel_is_active() -> anyhow::Result<()> {
        let (router, panels, loader) = router();
        assert_eq!(router.activate("products").await?, Activation::Activated { loaded: true });
        assert_eq!(router.activate("sections").await?, Activation::Activated { loaded: false });

        assert_eq!(*panels.active.borrow(), vec!["sections".to_owned()]);
        assert_eq!(*panels.title.borrow(), "Section Visibility");
        assert_eq!(router.active(), Some("sections"));
        assert_eq!(loader.0.get(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reactivating_is_a_no_op() -> anyhow::Result<()> {
        let (router, _, loader) = router();
        router.activate("products").await?;
        assert_eq!(router.activate("products").await?, Activation::AlreadyActive);
        assert_eq!(router.activate("dashboard").await?, Activation::Activated { loaded: false });
        assert_eq!(router.activate("products").await?, Activation::Activated { loaded: true });
        assert_eq!(loader.0.get(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_tab_is_rejected() {
        let (router, panels, _) = router();
        assert_eq!(
            router.activate("orders").await,
            Err(RouterError::UnknownTab("orders".into()))
        );
        assert!(panels.active.borrow().is_empty());
        assert_eq!(router.active(), Some("dashboard"));
        assert!(TabRouter::new(panels, "nope").is_err());
    }

    #[tokio::test]
    async fn reload_all_starts_every_loader() {
        let (router, _, loader) = router();
        let other = Rc::new(CountingLoader::default());
        router.register("videos", other.clone()).expect("videos is a tab");
        let spawner = QueueSpawner::default();

        assert_eq!(router.reload_all(&spawner), 2);
        spawner.run_until_idle().await;
        assert_eq!((loader.0.get(), other.0.get()), (1, 1));
    }
}
