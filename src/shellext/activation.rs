use crate::shellext::OpenInSublimeCommand;
use crate::shellext::boundary::guard;
use windows::{Win32::System::WinRT::*, core::*};

/// Factory handed out by `DllGetActivationFactory` for packaged registration.
#[implement(IActivationFactory)]
pub struct OpenInSublimeActivationFactory;

impl IActivationFactory_Impl for OpenInSublimeActivationFactory_Impl {
    fn ActivateInstance(&self) -> Result<IInspectable> {
        guard("ActivateInstance", || {
            let command: IUnknown = OpenInSublimeCommand::new().into();
            command.cast()
        })
    }
}
