use akira_motion_core::MotionContext;

use crate::layout::Mounted;
use crate::node::Node;

/// A piece of the site: a static view plus the motion it registers once laid out.
///
/// `attach` runs inside the mount's scope, so everything it registers on `cx`
/// (directly or from callbacks it installs) is released on unmount.
pub trait Component: 'static {
    fn name(&self) -> &str;

    fn view(&self) -> Node;

    fn attach(&mut self, cx: &mut MotionContext, mounted: &Mounted);
}
