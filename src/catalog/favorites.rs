use crate::domain::Station;

/// 收藏列表：按名字记录，最近收藏的在最前
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Favorites {
    names: Vec<String>,
}

impl Favorites {
    /// 从持久化数据恢复（去掉空名字与重复项，保留首次出现的位置）
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut out = Self::default();
        for name in names {
            if !name.is_empty() && !out.contains(&name) {
                out.names.push(name);
            }
        }
        out
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// 收藏；已存在时移动到最前
    pub fn add(&mut self, name: &str) {
        self.remove(name);
        self.names.insert(0, name.to_owned());
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        before != self.names.len()
    }

    /// 按名字解析为电台，解析不到的名字直接跳过
    pub fn resolve<'a>(&self, lookup: impl Fn(&str) -> Option<&'a Station>) -> Vec<Station> {
        self.names
            .iter()
            .filter_map(|n| lookup(n).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_moves_to_front() {
        let mut f = Favorites::default();
        f.add("X");
        f.add("Y");
        f.add("X");
        assert_eq!(f.names(), ["X", "Y"]);
    }

    #[test]
    fn from_names_dedups() {
        let f = Favorites::from_names(["A".to_owned(), String::new(), "A".to_owned(), "B".to_owned()]);
        assert_eq!(f.names(), ["A", "B"]);
    }

    #[test]
    fn resolve_drops_unknown_names() {
        let x = Station::new("X", "http://x");
        let f = Favorites::from_names(["X".to_owned(), "Y".to_owned()]);
        let out = f.resolve(|n| (n == "X").then_some(&x));
        assert_eq!(out, vec![x.clone()]);
    }
}
