/// Draw and collision layer. Lower values are drawn first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Layer(pub i32);

impl Layer {
    pub const BACKGROUND: Layer = Layer(-200);
    pub const STATIC_OBJECTS: Layer = Layer(-100);
    pub const DEFAULT: Layer = Layer(0);
    pub const FOREGROUND: Layer = Layer(100);
    pub const UI: Layer = Layer(200);

    #[inline]
    pub const fn offset(self, n: i32) -> Layer {
        Layer(self.0 + n)
    }
}

/// Free-form label attached to an object and reported on contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

impl Tag {
    pub const NONE: Tag = Tag("");

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
