use super::OpenInSublimeCommand;
use crate::lifecycle::INSTANCES;
use crate::shellext::boundary::guard;
use std::ptr::null_mut;
use windows::{
    Win32::{Foundation::*, System::Com::*},
    core::*,
};

// Class factory for creating instances of our context menu handler
#[implement(IClassFactory)]
pub struct OpenInSublimeCommandFactory;

impl IClassFactory_Impl for OpenInSublimeCommandFactory_Impl {
    fn CreateInstance(
        &self,
        outer: Option<&IUnknown>,
        iid: *const GUID,
        result: *mut *mut core::ffi::c_void,
    ) -> Result<()> {
        guard("CreateInstance", || {
            if result.is_null() {
                return Err(Error::from(E_POINTER));
            }
            unsafe { *result = null_mut() };

            if outer.is_some() {
                return Err(Error::from(CLASS_E_NOAGGREGATION));
            }

            let handler: IUnknown = OpenInSublimeCommand::new().into();
            unsafe { handler.query(iid, result).ok() }
        })
    }

    fn LockServer(&self, lock: BOOL) -> Result<()> {
        if lock.as_bool() {
            INSTANCES.lock();
        } else {
            INSTANCES.unlock();
        }
        tracing::trace!(target: "shellext::context_menu", lock = lock.as_bool(), count = INSTANCES.count(), "LockServer called");
        Ok(())
    }
}
