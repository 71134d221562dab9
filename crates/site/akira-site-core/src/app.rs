//! Mount/unmount runtime owning the motion context.

use std::any::Any;

use akira_motion_core::{MotionContext, Outputs, ScopeId};
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::SiteError;
use crate::layout::{layout, Mounted};
use crate::node::Node;
use crate::render::render_html;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MountId(pub u32);

struct Mount {
    id: MountId,
    name: String,
    scope: ScopeId,
    view: Node,
    mounted: Mounted,
    component: Box<dyn Any>,
}

/// Mounted components, stacked top to bottom in mount order.
pub struct App {
    cx: MotionContext,
    mounts: Vec<Mount>,
    next_mount: u32,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("mounts", &self.mounts.iter().map(|m| (m.id, &m.name)).collect::<Vec<_>>())
            .field("cx", &self.cx)
            .finish()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(MotionContext::default())
    }
}

impl App {
    pub fn new(cx: MotionContext) -> Self {
        Self {
            cx,
            mounts: Vec::new(),
            next_mount: 0,
        }
    }

    pub fn cx(&self) -> &MotionContext {
        &self.cx
    }

    pub fn cx_mut(&mut self) -> &mut MotionContext {
        &mut self.cx
    }

    /// Lay the component's view out below everything mounted so far, then attach
    /// it inside a fresh scope.
    pub fn mount<C: Component>(&mut self, mut component: C) -> MountId {
        let id = MountId(self.next_mount);
        self.next_mount += 1;
        let name = component.name().to_string();
        let view = component.view();
        let top = self.cx.scene().document_height();
        let mounted = layout(&mut self.cx, &view, top);

        let scope = self.cx.begin_scope(name.clone());
        component.attach(&mut self.cx, &mounted);
        self.cx.end_scope(scope);
        log::debug!("mounted {name} as {id:?} ({} elements)", mounted.elements().len());

        self.mounts.push(Mount {
            id,
            name,
            scope,
            view,
            mounted,
            component: Box::new(component),
        });
        id
    }

    /// Release everything the component registered and drop its elements.
    /// Returns the number of registrations released.
    pub fn unmount(&mut self, id: MountId) -> Result<usize, SiteError> {
        let idx = self
            .mounts
            .iter()
            .position(|m| m.id == id)
            .ok_or(SiteError::NotMounted(id))?;
        let mount = self.mounts.remove(idx);
        let released = self.cx.release_scope(mount.scope);
        if let Some(root) = mount.mounted.root() {
            self.cx.remove_element(root);
        }
        log::debug!("unmounted {} ({released} registrations)", mount.name);
        Ok(released)
    }

    pub fn unmount_all(&mut self) -> usize {
        let ids: Vec<MountId> = self.mounts.iter().map(|m| m.id).collect();
        ids.into_iter()
            .filter_map(|id| self.unmount(id).ok())
            .sum()
    }

    pub fn is_mounted(&self, id: MountId) -> bool {
        self.mounts.iter().any(|m| m.id == id)
    }

    pub fn mounted(&self, id: MountId) -> Option<&Mounted> {
        self.mounts.iter().find(|m| m.id == id).map(|m| &m.mounted)
    }

    pub fn component<C: Component>(&self, id: MountId) -> Option<&C> {
        self.mounts
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.component.downcast_ref())
    }

    /// Run `f` on a mounted component with the context, e.g. to forward pointer input.
    /// Registrations made here belong to the component's scope.
    pub fn with_component<C: Component, R>(
        &mut self,
        id: MountId,
        f: impl FnOnce(&mut C, &mut MotionContext, &Mounted) -> R,
    ) -> Option<R> {
        let mount = self.mounts.iter_mut().find(|m| m.id == id)?;
        let component = mount.component.downcast_mut::<C>()?;
        let entered = self.cx.enter_scope(mount.scope);
        let out = f(component, &mut self.cx, &mount.mounted);
        if entered {
            self.cx.end_scope(mount.scope);
        }
        Some(out)
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.cx.scroll_to(y);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.cx.resize(width, height);
    }

    pub fn tick(&mut self, dt: f32) -> Outputs {
        self.cx.tick(dt)
    }

    pub fn render_html(&self, id: MountId) -> Option<String> {
        let mount = self.mounts.iter().find(|m| m.id == id)?;
        Some(render_html(self.cx.scene(), &mount.view, &mount.mounted))
    }

    /// Every mount in order, concatenated.
    pub fn render_page(&self) -> String {
        self.mounts
            .iter()
            .map(|m| render_html(self.cx.scene(), &m.view, &m.mounted))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akira_motion_core::{Prop, TweenVars};

    struct Block(f32);

    impl Component for Block {
        fn name(&self) -> &str {
            "block"
        }

        fn view(&self) -> Node {
            Node::new("div").class("block").key("block").min_height(self.0)
        }

        fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted) {
            if let Some(el) = mounted.get("block") {
                cx.to(el, TweenVars::new().prop(Prop::Opacity, 0.5));
            }
        }
    }

    #[test]
    fn mounts_stack_and_release_everything() {
        let mut app = App::default();
        let a = app.mount(Block(300.0));
        let b = app.mount(Block(200.0));
        let rb = app.mounted(b).and_then(|m| m.root()).unwrap();
        assert_eq!(app.cx().scene().get(rb).unwrap().rect.y, 300.0);

        // work done later through the component still belongs to its mount
        app.with_component(b, |_: &mut Block, cx, m| {
            cx.to(m.root().unwrap(), TweenVars::new().prop(Prop::Y, 10.0));
        });
        assert_eq!(app.cx().engine().len(), 3);
        assert_eq!(app.unmount(b).unwrap(), 2);
        assert_eq!(app.cx().engine().len(), 1);
        assert!(app.is_mounted(a));
        assert_eq!(app.unmount_all(), 1);
        assert!(app.cx().scene().is_empty());
    }
}
