//! Starter files for new projects.

/// Folder under the project root that holds the starter files.
pub const SOURCE_FOLDER: &str = "src";

/// Body of `src/App.js`.
pub const APP_JS: &str = r#"import React from 'react';

function App() {
  return (
    <div className="App">
      <h1>Welcome to CipherStudio</h1>
      <p>Start coding your React app!</p>
    </div>
  );
}

export default App;"#;

/// Body of `src/index.js`.
pub const INDEX_JS: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);"#;

/// Files created in [`SOURCE_FOLDER`], in creation order.
pub const SEED_FILES: [(&str, &str); 2] = [("App.js", APP_JS), ("index.js", INDEX_JS)];
