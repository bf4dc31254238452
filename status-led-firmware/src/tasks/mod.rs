// Task-Modul: Enthält alle Embassy Tasks
//
// Timer-Dispatch-Tasks sind der Callback-Kontext der Status-LED,
// der Demo-Task ist ein normaler Aufrufer.

pub mod demo;
pub mod timer_dispatch;

// Re-export Tasks für einfachen Import
pub use demo::demo_task;
pub use timer_dispatch::timer_dispatch_task;
