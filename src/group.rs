//! Named attribute groups
//!
//! An [`AttributeGroup`] is the registry for one device: it owns the field
//! descriptors and a shared [`RegisterLock`] handle to the device, and
//! resolves attribute names to show/store operations. Every operation runs
//! inside the device lock, so a store's read-modify-write cannot interleave
//! with another user of the same lock.
//!
//! ```
//! use core::cell::RefCell;
//! use platform_bitfield::{AttributeGroup, FieldDescriptor, FieldKind, MmioInterface};
//!
//! static LED_COLORS: [&str; 4] = ["amber", "red", "green", "off"];
//!
//! let mut window = [0b0000_1000u8; 16];
//! let mmio = RefCell::new(MmioInterface::new(&mut window));
//!
//! let mut cpld: AttributeGroup<_, 8> = AttributeGroup::new("cpld", &mmio);
//! cpld.register(FieldDescriptor::new("led_diag", 0x07, 2, 2, FieldKind::Enumerated(&LED_COLORS)))
//!     .unwrap();
//!
//! assert_eq!(cpld.get("led_diag").unwrap(), "green");
//! cpld.set("led_diag", "off").unwrap();
//! assert_eq!(cpld.get("led_diag").unwrap(), "off");
//! ```

use core::fmt;

use crate::access::{RegisterAccess, span_fits};
use crate::codec::Value;
use crate::field::FieldDescriptor;
use crate::lock::RegisterLock;
use crate::{Error, runtime};

/// Error type of attribute groups bound to the lock `L`
pub type GroupError<L> =
    Error<<<L as RegisterLock>::Access as RegisterAccess>::Error>;

/// Registry of named fields on one device
pub struct AttributeGroup<L: RegisterLock, const N: usize> {
    name: &'static str,
    lock: L,
    fields: heapless::Vec<FieldDescriptor, N>,
}

impl<L: RegisterLock, const N: usize> AttributeGroup<L, N> {
    /// Create an empty group bound to a device
    pub const fn new(name: &'static str, lock: L) -> Self {
        Self {
            name,
            lock,
            fields: heapless::Vec::new(),
        }
    }

    /// Group name (e.g. the device the attributes belong to)
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The shared device handle
    pub const fn lock(&self) -> &L {
        &self.lock
    }

    /// Add a field
    ///
    /// # Errors
    /// - `InvalidConfig` if the descriptor is malformed, reaches past the
    ///   device's last register, or reuses a name
    /// - `Full` if the group already holds `N` fields
    pub fn register(&mut self, field: FieldDescriptor) -> Result<(), GroupError<L>> {
        let result = self.check(&field).and_then(|()| {
            self.fields.push(field).map_err(|_| Error::Full)
        });

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("{}: rejected attribute {}", self.name, field.name);
        }

        result
    }

    /// Add every field of a table, stopping at the first rejected one
    ///
    /// # Errors
    /// See [`register`](Self::register).
    pub fn extend(&mut self, fields: &[FieldDescriptor]) -> Result<(), GroupError<L>> {
        fields.iter().try_for_each(|field| self.register(*field))
    }

    fn check(&self, field: &FieldDescriptor) -> Result<(), GroupError<L>> {
        field.validate().map_err(Error::widen)?;
        let max = <L::Access as RegisterAccess>::MAX_REGISTER;
        if !span_fits(field.register, field.register_count(), max) {
            return Err(Error::InvalidConfig);
        }
        if self.descriptor(field.name).is_some() {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Look up a field by attribute name
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Attribute names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn find(&self, name: &str) -> Result<&FieldDescriptor, GroupError<L>> {
        self.descriptor(name).ok_or(Error::UnknownAttribute)
    }

    /// Read an attribute
    ///
    /// # Errors
    /// `UnknownAttribute`, or any error of [`runtime::show`].
    pub fn get(&self, name: &str) -> Result<Value, GroupError<L>> {
        let field = self.find(name)?;
        self.lock
            .with_register_lock(field.register, field.register_count(), |access| {
                runtime::show(field, access)
            })
    }

    /// Write an attribute
    ///
    /// The whole read-modify-write runs inside the device lock.
    ///
    /// # Errors
    /// `UnknownAttribute`, or any error of [`runtime::store`].
    pub fn set(&self, name: &str, text: &str) -> Result<(), GroupError<L>> {
        let field = self.find(name)?;
        self.lock
            .with_register_lock(field.register, field.register_count(), |access| {
                runtime::store(field, access, text)
            })
    }

    /// Read an attribute in sysfs framing (value and newline)
    ///
    /// Returns the number of bytes written to `out`.
    ///
    /// # Errors
    /// `Format` if `out` rejects the text, otherwise as [`get`](Self::get).
    pub fn show<W: fmt::Write>(&self, name: &str, out: &mut W) -> Result<usize, GroupError<L>> {
        let value = self.get(name)?;
        writeln!(out, "{value}").map_err(|_| Error::Format)?;
        Ok(value.len() + 1)
    }

    /// Write an attribute in sysfs framing
    ///
    /// Returns the number of bytes consumed, which is all of `buf`.
    ///
    /// # Errors
    /// As [`set`](Self::set).
    pub fn store(&self, name: &str, buf: &str) -> Result<usize, GroupError<L>> {
        self.set(name, buf)?;
        Ok(buf.len())
    }

    /// Run several accesses as one critical section
    ///
    /// Use this to update sibling fields of a register together, or to read
    /// a consistent snapshot of several fields.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Transaction<'_, L::Access>) -> R) -> R {
        let (first, count) = self.span();
        self.lock.with_register_lock(first, count, |access| {
            let mut txn = Transaction {
                fields: &self.fields[..],
                access,
            };
            f(&mut txn)
        })
    }

    /// Smallest register range covering every field
    fn span(&self) -> (u32, usize) {
        let first = self.fields.iter().map(|f| f.register).min().unwrap_or(0);
        let end = self
            .fields
            .iter()
            .map(|f| u64::from(f.register) + f.register_count() as u64)
            .max()
            .unwrap_or(0);
        let count = usize::try_from(end.saturating_sub(u64::from(first))).unwrap_or(usize::MAX);
        (first, count)
    }
}

/// Accesses made while an [`AttributeGroup`]'s device lock is held
pub struct Transaction<'a, A: RegisterAccess> {
    fields: &'a [FieldDescriptor],
    access: &'a mut A,
}

impl<A: RegisterAccess> Transaction<'_, A> {
    fn find(&self, name: &str) -> Result<FieldDescriptor, Error<A::Error>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .copied()
            .ok_or(Error::UnknownAttribute)
    }

    /// Read an attribute
    ///
    /// # Errors
    /// As [`AttributeGroup::get`].
    pub fn get(&mut self, name: &str) -> Result<Value, Error<A::Error>> {
        let field = self.find(name)?;
        runtime::show(&field, &mut *self.access)
    }

    /// Write an attribute
    ///
    /// # Errors
    /// As [`AttributeGroup::set`].
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), Error<A::Error>> {
        let field = self.find(name)?;
        runtime::store(&field, &mut *self.access, text)
    }
}
