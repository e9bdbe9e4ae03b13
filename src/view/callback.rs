use std::{fmt, rc::Rc};

/// Declarative callback prop
///
/// Clones share the same closure. Two callbacks are equal only when they are
/// clones of each other, which is how re-renders detect a new callback.
pub struct Callback<IN> {
    cb: Rc<dyn Fn(IN)>,
}

impl<IN> Callback<IN> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(IN) + 'static,
    {
        Self { cb: Rc::new(f) }
    }

    pub fn emit(&self, value: IN) {
        (self.cb)(value)
    }
}

impl<IN, F> From<F> for Callback<IN>
where
    F: Fn(IN) + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl<IN> Clone for Callback<IN> {
    fn clone(&self) -> Self {
        Self {
            cb: Rc::clone(&self.cb),
        }
    }
}

impl<IN> PartialEq for Callback<IN> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cb, &other.cb)
    }
}

impl<IN> fmt::Debug for Callback<IN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.cb) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit() {
        let total = Rc::new(Cell::new(0));
        let sink = Rc::clone(&total);
        let cb = Callback::new(move |n: i32| sink.set(sink.get() + n));

        cb.emit(2);
        cb.emit(3);
        assert_eq!(total.get(), 5);
    }

    #[test]
    fn test_identity() {
        let a: Callback<()> = Callback::new(|_| {});
        let b: Callback<()> = Callback::new(|_| {});

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
