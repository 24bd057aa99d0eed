use crate::special::Special;

/// An ordered, duplicate-rejecting string-keyed map.
///
/// Object children must preserve the codec's insertion order (spec §3) and
/// there is no requirement for the scale a hash map earns its keep at --
/// rule documents and the trees they rewrite are small. A `Vec<(String,
/// Value)>` covers the full contract with no extra dependency.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap(Vec<(String, Value)>);

impl OrderedMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts a new key. Returns `Err` with the key if it is already
    /// present -- objects reject duplicate keys (spec §3).
    pub fn try_insert(&mut self, key: String, value: Value) -> Result<(), String> {
        if self.0.iter().any(|(k, _)| k == &key) {
            return Err(key);
        }
        self.0.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.0.iter_mut().map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Value)> for OrderedMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The four node shapes a [`Value`] can take (spec §3).
#[derive(Debug, Clone)]
pub enum Shape {
    /// A textual scalar.
    Primitive(String),
    /// An ordered mapping from string keys to child nodes.
    Object(OrderedMap),
    /// An ordered list of child nodes.
    Array(Vec<Value>),
    /// An engine-internal node produced by the pattern builder or template
    /// builder from a `*`-typed node; never produced by the tree codec.
    Special(Box<Special>),
}

/// A node in the rewritten tree.
///
/// Every `Value` carries an optional typename string in addition to its
/// shape (spec §3). Plain documents -- the codec's output, the trees a
/// rewrite consumes and produces -- only ever use the `Primitive` /
/// `Object` / `Array` shapes. `Special` only appears inside a built
/// pattern (`Rule::from`) or template (`Rule::to`), where the pattern/
/// template builder has replaced a `*`-typed node with its parsed form.
#[derive(Debug, Clone)]
pub struct Value {
    ty: Option<String>,
    shape: Shape,
}

impl Value {
    pub fn new(ty: Option<String>, shape: Shape) -> Self {
        Self { ty, shape }
    }

    pub fn primitive(ty: Option<String>, text: impl Into<String>) -> Self {
        Self::new(ty, Shape::Primitive(text.into()))
    }

    pub fn object(ty: Option<String>, map: OrderedMap) -> Self {
        Self::new(ty, Shape::Object(map))
    }

    pub fn array(ty: Option<String>, items: Vec<Value>) -> Self {
        Self::new(ty, Shape::Array(items))
    }

    pub fn special(ty: Option<String>, special: Special) -> Self {
        Self::new(ty, Shape::Special(Box::new(special)))
    }

    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    pub fn set_ty(&mut self, ty: Option<String>) {
        self.ty = ty;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }

    pub fn as_primitive(&self) -> Option<&str> {
        match &self.shape {
            Shape::Primitive(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&OrderedMap> {
        match &self.shape {
            Shape::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.shape {
            Shape::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_special(&self) -> Option<&Special> {
        match &self.shape {
            Shape::Special(special) => Some(special),
            _ => None,
        }
    }

    /// Children in iteration order, for the rule driver's pre-order descent
    /// (spec §4.5 phase 3). Primitives and specials have none.
    pub fn children_mut(&mut self) -> Box<dyn Iterator<Item = &mut Value> + '_> {
        match &mut self.shape {
            Shape::Object(map) => Box::new(map.values_mut()),
            Shape::Array(items) => Box::new(items.iter_mut()),
            Shape::Primitive(_) | Shape::Special(_) => Box::new(std::iter::empty()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.ty != other.ty {
            return false;
        }
        match (&self.shape, &other.shape) {
            (Shape::Primitive(a), Shape::Primitive(b)) => a == b,
            (Shape::Object(a), Shape::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Shape::Array(a), Shape::Array(b)) => a == b,
            // Special nodes are engine-internal pattern/template state and
            // are never present in the plain data trees this comparison is
            // meant for; treat them as never structurally equal.
            (Shape::Special(_), Shape::Special(_)) => false,
            _ => false,
        }
    }
}
