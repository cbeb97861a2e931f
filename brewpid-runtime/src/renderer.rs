use brewpid_core::ChartFrame;
use std::sync::mpsc::Sender;

/// Drawing surface for prepared chart frames.
pub trait ChartRenderer: Send {
    fn render(&mut self, frame: &ChartFrame);
}

/// Hands frames to another thread.
pub struct FrameChannel {
    tx: Sender<ChartFrame>,
}

impl FrameChannel {
    pub fn new(tx: Sender<ChartFrame>) -> Self {
        Self { tx }
    }
}

impl ChartRenderer for FrameChannel {
    fn render(&mut self, frame: &ChartFrame) {
        let _ = self.tx.send(frame.clone());
    }
}
